use crate::domain::LeadStatus;
use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn status_badge(status: LeadStatus) -> Markup {
    let class = match status {
        LeadStatus::New => "badge bg-blue-100 text-blue-800",
        LeadStatus::Contacted => "badge bg-yellow-100 text-yellow-800",
        LeadStatus::Quoted => "badge bg-purple-100 text-purple-800",
        LeadStatus::Won => "badge bg-green-100 text-green-800",
        LeadStatus::Lost => "badge bg-red-100 text-red-800",
    };
    html! {
        span class=(class) { (status.as_str()) }
    }
}

/// Inline error/notice banner.
pub fn notice(message: &str) -> Markup {
    html! {
        p class="notice" role="alert" { (message) }
    }
}
