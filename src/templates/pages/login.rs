use crate::templates::{components::notice, desktop_layout};
use maud::{html, Markup};

pub fn login_page(failed: bool) -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            div class="container narrow" {
                h1 { "Sign in" }
                p class="lead" { "Sign in to continue" }

                @if failed {
                    (notice("Invalid username or password."))
                }

                form method="post" action="/login" class="stack" {
                    label for="username" { "Username" }
                    input id="username" name="username" autocomplete="username" required;

                    label for="password" { "Password" }
                    input id="password" name="password" type="password"
                        autocomplete="current-password" required;

                    button type="submit" class="primary" { "Sign in" }
                }
            }
        },
    )
}
