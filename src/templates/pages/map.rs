use crate::domain::Lead;
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};
use serde::Serialize;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Default view: Salt Lake valley.
const CENTER: (f64, f64) = (40.65, -111.9);

#[derive(Serialize)]
struct Marker<'a> {
    id: i64,
    name: &'a str,
    status: &'static str,
    address: String,
    lat: f64,
    lng: f64,
}

fn markers_json(leads: &[Lead]) -> String {
    let markers: Vec<Marker> = leads
        .iter()
        .filter_map(|lead| {
            let (lat, lng) = lead.coordinates()?;
            Some(Marker {
                id: lead.id,
                name: &lead.name,
                status: lead.status.as_str(),
                address: lead.location_line(),
                lat,
                lng,
            })
        })
        .collect();

    // inlined into a <script> block
    serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

pub fn map_page(leads: &[Lead]) -> Markup {
    let script = format!(
        r#"
const leads = {markers};
const map = L.map('map').setView([{lat}, {lng}], 10);
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);

function addMarker(lead) {{
  const link = document.createElement('a');
  link.href = '/leads/' + lead.id;
  link.textContent = lead.name;
  const popup = document.createElement('div');
  popup.append(link, document.createElement('br'), lead.status);
  if (lead.address) {{
    popup.append(document.createElement('br'), lead.address);
  }}
  L.marker([lead.lat, lead.lng]).addTo(map).bindPopup(popup);
}}

leads.forEach(addMarker);

map.on('click', async (e) => {{
  const name = prompt('Name for a new lead here?');
  if (!name || !name.trim()) return;
  const res = await fetch('/api/leads', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ name: name.trim(), lat: e.latlng.lat, lng: e.latlng.lng }})
  }});
  if (res.ok) {{
    addMarker(await res.json());
  }} else {{
    alert('Could not save');
  }}
}});
"#,
        markers = markers_json(leads),
        lat = CENTER.0,
        lng = CENTER.1,
    );

    desktop_layout(
        "Map",
        true,
        html! {
            link rel="stylesheet" href=(LEAFLET_CSS);
            h1 { "Map" }
            p class="muted" { "Click anywhere on the map to drop a new lead." }
            div id="map" style="height: 70vh" {}
            script src=(LEAFLET_JS) {}
            script { (PreEscaped(script)) }
        },
    )
}
