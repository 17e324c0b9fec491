pub mod components;
pub mod layouts;
pub mod pages;

use maud::{html, Markup};

pub use components::{card, notice, status_badge};
pub use layouts::desktop::desktop_layout;

pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        "Error",
        false,
        html! {
            div class="container narrow" {
                h1 { (status) }
                p { (message) }
                a href="/" { "Back to leads" }
            }
        },
    )
}
