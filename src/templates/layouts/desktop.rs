use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLES: &str = "
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
nav ul { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
.container { max-width: 64rem; margin: 1.5rem auto; padding: 0 1rem; }
.narrow { max-width: 24rem; }
.stack { display: flex; flex-direction: column; gap: 0.5rem; max-width: 32rem; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.4rem; border-bottom: 1px solid #e5e7eb; }
.badge { padding: 0.1rem 0.5rem; border-radius: 9999px; font-size: 0.8rem; }
.notice { background: #fef2f2; color: #991b1b; padding: 0.5rem 0.75rem; }
.muted, .empty { color: #6b7280; }
.danger { color: #b91c1c; }
";

/// Page chrome. `signed_in` hides the nav on the login page.
pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Lead Ledger" }
                style { (PreEscaped(STYLES)) }
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    h3 { "Lead Ledger" }
                    @if signed_in {
                        nav {
                            ul {
                                li { a href="/" { "Leads" } }
                                li { a href="/leads/new" { "New lead" } }
                                li { a href="/map" { "Map" } }
                                li { a href="/prospecting" { "Prospecting" } }
                            }
                        }
                        form method="post" action="/logout" {
                            button type="submit" class="text-base font-medium" { "Sign out" }
                        }
                    }
                }
                main class="container" {
                    (content)
                }
            }
        }
    }
}
