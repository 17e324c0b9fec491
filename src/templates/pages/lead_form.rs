use crate::domain::lead::SOURCES;
use crate::domain::{Lead, LeadStatus};
use crate::templates::{card, desktop_layout, notice};
use maud::{html, Markup};

/// New-lead form when `lead` is None, edit form otherwise.
pub fn lead_form_page(lead: Option<&Lead>, error: Option<&str>) -> Markup {
    let title = if lead.is_some() { "Edit lead" } else { "New lead" };
    let action = lead
        .map(|l| format!("/leads/{}", l.id))
        .unwrap_or_else(|| "/leads".to_string());
    let status = lead.map(|l| l.status).unwrap_or_default();
    let source = field(lead, |l| l.source.as_deref());

    desktop_layout(
        title,
        true,
        html! {
            h1 { (title) }

            @if let Some(msg) = error {
                (notice(msg))
            }

            form method="post" action=(action) class="stack" {
                label for="name" { "Name *" }
                input id="name" name="name" required value=(lead.map(|l| l.name.as_str()).unwrap_or(""));

                label for="phone" { "Phone" }
                input id="phone" name="phone" type="tel" value=(field(lead, |l| l.phone.as_deref()));

                label for="email" { "Email" }
                input id="email" name="email" type="email" value=(field(lead, |l| l.email.as_deref()));

                label for="address" { "Address" }
                input id="address" name="address" value=(field(lead, |l| l.address.as_deref()));

                label for="city" { "City" }
                input id="city" name="city" value=(field(lead, |l| l.city.as_deref()));

                label for="status" { "Status" }
                select id="status" name="status" {
                    @for s in LeadStatus::ALL {
                        option value=(s.as_str()) selected[s == status] { (s.as_str()) }
                    }
                }

                label for="source" { "Source" }
                select id="source" name="source" {
                    option value="" selected[source.is_empty()] { "Unknown" }
                    // free-text sources from the API stay selectable
                    @if !source.is_empty() && !SOURCES.contains(&source) {
                        option value=(source) selected { (source) }
                    }
                    @for s in SOURCES {
                        option value=(s) selected[source == *s] { (s) }
                    }
                }

                label for="notes" { "Notes" }
                textarea id="notes" name="notes" rows="4" { (field(lead, |l| l.notes.as_deref())) }

                button type="submit" class="primary" { "Save" }
            }

            @if let Some(l) = lead {
                (card("Location", html! {
                    @match l.coordinates() {
                        Some((lat, lng)) => {
                            p { (format!("{lat:.5}, {lng:.5}")) " " a href="/map" { "View map" } }
                        }
                        None => {
                            p class="muted" { "Not located yet." }
                        }
                    }
                }))
                form method="post" action=(format!("/leads/{}/delete", l.id))
                    onsubmit="return confirm('Delete this lead?')" {
                    button type="submit" class="danger" { "Delete" }
                }
            }
        },
    )
}

fn field<'a>(lead: Option<&'a Lead>, get: impl Fn(&'a Lead) -> Option<&'a str>) -> &'a str {
    lead.and_then(get).unwrap_or("")
}
