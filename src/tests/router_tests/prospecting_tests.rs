use crate::tests::utils::{body_json, get, header, prospect, test_app_with, CountingGeocoder, FakeParcels};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn parcels_a10_b5() -> FakeParcels {
    let a = (0..10).map(|i| prospect("A", i, 5000 + (i as i64) * 100)).collect();
    let b = (0..5).map(|i| prospect("B", i, 5050 + (i as i64) * 300)).collect();
    FakeParcels::default().with("A", a).with("B", b)
}

fn app_with(parcels: FakeParcels) -> (crate::app::AppState, Arc<FakeParcels>) {
    let parcels = Arc::new(parcels);
    let app = test_app_with(CountingGeocoder::never_matching(), parcels.clone());
    (app, parcels)
}

#[test]
fn page_merges_regions_sorted_by_sqft() {
    let (app, _) = app_with(parcels_a10_b5());

    let page = body_json(get(&app, "/api/prospecting?counties=A,B&page=0"));
    let rows = page["prospects"].as_array().unwrap();

    assert_eq!(rows.len(), 15);
    assert_eq!(page["total"], 15);
    assert_eq!(page["page"], 0);
    assert_eq!(page["pageSize"], 100);
    assert_eq!(page["totalPages"], 1);

    let sqft: Vec<i64> = rows.iter().map(|p| p["sqft"].as_i64().unwrap()).collect();
    let mut sorted = sqft.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(sqft, sorted);
    assert_eq!(rows[0]["builtYear"], 1985);
}

#[test]
fn export_returns_everything() {
    let (app, _) = app_with(parcels_a10_b5());

    let export = body_json(get(&app, "/api/prospecting?counties=A,B&export=1"));
    assert_eq!(export["total"], 15);
    assert_eq!(export["prospects"].as_array().unwrap().len(), 15);
    assert!(export.get("pageSize").is_none());
}

#[test]
fn failed_region_contributes_nothing() {
    let (app, _) = app_with(parcels_a10_b5().failing("C"));

    let page = body_json(get(&app, "/api/prospecting"));
    assert_eq!(page["total"], 15);

    let regions = page["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0]["name"], "A");
    assert_eq!(regions[0]["status"], "ok");
    assert_eq!(regions[0]["count"], 10);
    assert_eq!(regions[2]["name"], "C");
    assert_eq!(regions[2]["status"], "failed");
    assert_eq!(regions[2]["count"], 0);
}

#[test]
fn empty_selection_queries_nothing() {
    let (app, parcels) = app_with(parcels_a10_b5());

    let page = body_json(get(&app, "/api/prospecting?counties="));
    assert_eq!(page["total"], 0);
    assert_eq!(parcels.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_regions_are_ignored() {
    let (app, parcels) = app_with(parcels_a10_b5());

    let page = body_json(get(&app, "/api/prospecting?counties=B,Nowhere"));
    assert_eq!(page["total"], 5);
    assert_eq!(parcels.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn bad_page_index_reads_as_zero() {
    let (app, _) = app_with(parcels_a10_b5());

    for q in ["page=-3", "page=abc", "page="] {
        let page = body_json(get(&app, &format!("/api/prospecting?counties=A&{q}")));
        assert_eq!(page["page"], 0, "{q}");
        assert_eq!(page["prospects"].as_array().unwrap().len(), 10);
    }
}

#[test]
fn page_past_the_end_is_empty() {
    let (app, _) = app_with(parcels_a10_b5());

    let page = body_json(get(&app, "/api/prospecting?counties=A,B&page=4"));
    assert_eq!(page["total"], 15);
    assert!(page["prospects"].as_array().unwrap().is_empty());
}

#[test]
fn xlsx_export_downloads_a_workbook() {
    let (app, _) = app_with(parcels_a10_b5());

    let resp = get(&app, "/prospecting/export.xlsx?counties=A");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type").as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert!(header(&resp, "Content-Disposition")
        .unwrap()
        .contains("prospects-"));
}

#[test]
fn checkbox_form_with_blank_marker_selects_only_checked() {
    let (app, parcels) = app_with(parcels_a10_b5());

    let page = body_json(get(&app, "/api/prospecting?counties=&counties=B"));
    assert_eq!(page["total"], 5);
    assert_eq!(parcels.calls.load(Ordering::SeqCst), 1);
}
