use crate::parcels::RECORDS_PER_REGION;
use crate::prospecting::{ProspectPage, Region, RegionState};
use crate::templates::{components::notice, desktop_layout};
use maud::{html, Markup};
use url::form_urlencoded;

pub struct ProspectingVm<'a> {
    pub regions: &'a [Region],
    pub selected: &'a [&'a Region],
    pub page: &'a ProspectPage,
}

impl ProspectingVm<'_> {
    fn counties_param(&self) -> String {
        let names: Vec<&str> = self.selected.iter().map(|r| r.name).collect();
        form_urlencoded::Serializer::new(String::new())
            .append_pair("counties", &names.join(","))
            .finish()
    }

    fn is_selected(&self, region: &Region) -> bool {
        self.selected.iter().any(|r| r.name == region.name)
    }
}

pub fn prospecting_page(vm: &ProspectingVm) -> Markup {
    let page = vm.page;
    let query = vm.counties_param();
    let failed: Vec<&str> = page
        .regions
        .iter()
        .filter(|r| r.status == RegionState::Failed)
        .map(|r| r.name.as_str())
        .collect();

    desktop_layout(
        "Prospecting",
        true,
        html! {
            h1 { "Prospecting" }
            p class="muted" {
                "Residential parcels 4,000 sqft and up, built 20+ years ago. "
                "Up to " (RECORDS_PER_REGION) " per county."
            }

            form method="get" action="/prospecting" class="flex gap-2" {
                // keeps an all-unchecked submit an explicit empty selection
                input type="hidden" name="counties" value="";
                @for region in vm.regions {
                    label {
                        input type="checkbox" name="counties" value=(region.name)
                            checked[vm.is_selected(region)];
                        " " (region.name)
                    }
                }
                button type="submit" { "Search" }
            }

            @if !failed.is_empty() {
                (notice(&format!("Could not reach: {}", failed.join(", "))))
            }

            div class="flex items-center justify-between" {
                p { (page.total) " prospects" }
                a href=(format!("/prospecting/export.xlsx?{query}")) class="button" { "Export to Excel" }
            }

            @if page.prospects.is_empty() {
                p class="empty" { "No prospects found." }
            } @else {
                table class="prospects" {
                    thead {
                        tr {
                            th { "Address" }
                            th { "City" }
                            th { "County" }
                            th { "Sqft" }
                            th { "Built" }
                            th { "Age" }
                        }
                    }
                    tbody {
                        @for p in &page.prospects {
                            tr {
                                td { (p.address) }
                                td { (p.city) }
                                td { (p.county) }
                                td { (p.sqft) }
                                td { (p.built_year) }
                                td { (p.age) }
                            }
                        }
                    }
                }
            }

            @if page.total_pages > 1 {
                nav class="pager" {
                    @if page.page > 0 {
                        a href=(format!("/prospecting?{query}&page={}", page.page - 1)) { "Previous" }
                    }
                    span { "Page " (page.page + 1) " of " (page.total_pages) }
                    @if page.page + 1 < page.total_pages {
                        a href=(format!("/prospecting?{query}&page={}", page.page + 1)) { "Next" }
                    }
                }
            }
        },
    )
}
