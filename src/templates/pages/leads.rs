use crate::domain::{Lead, LeadStatus};
use crate::templates::{components::status_badge, desktop_layout};
use maud::{html, Markup};

pub struct LeadsVm<'a> {
    pub leads: &'a [Lead],
    pub search: &'a str,
    pub status: Option<LeadStatus>,
    /// Pipeline summary, one entry per status.
    pub counts: &'a [(LeadStatus, i64)],
}

pub fn leads_page(vm: &LeadsVm) -> Markup {
    desktop_layout(
        "Leads",
        true,
        html! {
            div class="flex items-center justify-between" {
                h1 { "Leads" }
                a href="/leads/new" class="button primary" { "New lead" }
            }

            ul class="pipeline flex gap-2" {
                @for (status, count) in vm.counts {
                    li {
                        a href=(format!("/?status={}", status.as_str())) {
                            (status_badge(*status)) " " strong { (count) }
                        }
                    }
                }
            }

            form method="get" action="/" class="flex gap-2" {
                input type="search" name="search" value=(vm.search)
                    placeholder="Search name, phone, address, city";
                select name="status" {
                    option value="" selected[vm.status.is_none()] { "All statuses" }
                    @for status in LeadStatus::ALL {
                        option value=(status.as_str()) selected[vm.status == Some(status)] { (status.as_str()) }
                    }
                }
                button type="submit" { "Filter" }
            }

            @if vm.leads.is_empty() {
                p class="empty" { "No leads found." }
            } @else {
                table class="leads" {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Phone" }
                            th { "Address" }
                            th { "Status" }
                            th { "Source" }
                            th { "Added" }
                        }
                    }
                    tbody {
                        @for lead in vm.leads {
                            tr {
                                td { a href=(format!("/leads/{}", lead.id)) { (lead.name) } }
                                td { (lead.phone.as_deref().unwrap_or("")) }
                                td { (lead.location_line()) }
                                td { (status_badge(lead.status)) }
                                td { (lead.source.as_deref().unwrap_or("")) }
                                td { (lead.created_at.format("%b %-d, %Y").to_string()) }
                            }
                        }
                    }
                }
            }
        },
    )
}
