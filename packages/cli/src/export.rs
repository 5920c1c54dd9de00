//! Static page export.
//!
//! Writes a snapshot of one selection: `results.html` (the filtered table),
//! `markers.geojson` (one point per location) and `index.html`, a page with
//! the dropdowns, the map and the results area. The page carries every
//! location's table and placed popup, so hovering and clicking markers
//! works without a server; changing the selection needs a new export.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use car_map_dashboard::{ControlId, Dashboard, DashboardConfig, SelectControl, UiEvent};
use car_map_map::{GeoJsonSurface, MarkerId};
use car_map_table::HtmlTable;
use car_map_table::html::escape;
use serde::Serialize;

type PageDashboard = Dashboard<HtmlTable, GeoJsonSurface>;

/// What the page shows for one marker.
#[derive(Debug, Serialize)]
struct Panel {
    html: String,
    popup: String,
    offset: [f64; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageData<'a> {
    access_token: Option<&'a str>,
    style: &'a str,
    center: [f64; 2],
    zoom: f64,
    placeholder: String,
    panels: BTreeMap<u64, Panel>,
    markers: serde_json::Value,
}

/// Writes the page for the dashboard's current selection into `out`.
///
/// Every marker is clicked once to capture its table and popup, and the
/// map background last, so the dashboard ends with no popup shown.
///
/// # Errors
///
/// * If the output directory or a file cannot be written
/// * If the marker data cannot be serialized
pub fn write_site(
    dashboard: &mut PageDashboard,
    config: &DashboardConfig,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = dashboard.table().html().to_string();
    let panels = capture_panels(dashboard)?;

    dashboard.handle(UiEvent::BackgroundClicked)?;
    let placeholder = dashboard.table().html().to_string();

    let surface = dashboard.map().surface();
    let geojson = surface.to_json()?;
    let data = PageData {
        access_token: config.map.access_token.as_deref(),
        style: &config.map.style,
        center: config.map.viewport.center,
        zoom: config.map.viewport.zoom,
        placeholder,
        panels,
        markers: serde_json::to_value(surface.feature_collection())?,
    };
    if data.access_token.is_none() {
        log::warn!("No map access token configured; the exported map will not load tiles");
    }

    let page = render_page(dashboard, &results, &serde_json::to_string(&data)?);

    std::fs::create_dir_all(out)?;
    std::fs::write(out.join("index.html"), page)?;
    std::fs::write(out.join("results.html"), &results)?;
    std::fs::write(out.join("markers.geojson"), geojson)?;

    log::info!(
        "Exported {} cars at {} locations to {}",
        dashboard.subset().len(),
        data.panels.len(),
        out.display()
    );

    Ok(())
}

fn capture_panels(
    dashboard: &mut PageDashboard,
) -> Result<BTreeMap<u64, Panel>, Box<dyn std::error::Error>> {
    let ids: Vec<MarkerId> = dashboard.map().markers().map(|marker| marker.id).collect();

    let mut panels = BTreeMap::new();
    for id in ids {
        dashboard.handle(UiEvent::MarkerClicked(id))?;
        let Some((popup, offset)) = dashboard.map().surface().popup(id) else {
            continue;
        };
        panels.insert(
            id.0,
            Panel {
                html: dashboard.table().html().to_string(),
                popup: popup.text(),
                offset: [offset.x, offset.y],
            },
        );
    }

    Ok(panels)
}

fn render_page(dashboard: &PageDashboard, results: &str, data: &str) -> String {
    let controller = dashboard.controller();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Car Map</title>
    <link href="https://api.mapbox.com/mapbox-gl-js/v2.15.0/mapbox-gl.css" rel="stylesheet">
    <script src="https://api.mapbox.com/mapbox-gl-js/v2.15.0/mapbox-gl.js"></script>
    <style>{css}</style>
</head>
<body>
    <div class="controls">
        {make}
        {model}
        {year}
        <button id="{clear}" disabled>Clear</button>
    </div>
    <div id="{map}"></div>
    <div id="{results_id}">{results}</div>
    <script id="page-data" type="application/json">{data}</script>
    <script>{js}</script>
</body>
</html>
"#,
        css = INLINE_CSS,
        js = INLINE_JAVASCRIPT,
        make = render_select(controller.make()),
        model = render_select(controller.model()),
        year = render_select(controller.year()),
        clear = ControlId::ClearButton,
        map = ControlId::Map,
        results_id = ControlId::Results,
        data = script_safe(data),
    )
}

/// A disabled `<select>` showing the control's options and selection.
fn render_select(control: &SelectControl) -> String {
    let label = match control.id() {
        ControlId::Make => "Make",
        ControlId::Model => "Model",
        _ => "Year",
    };

    let mut html = format!("<label>{label} <select id=\"{}\" disabled>", control.id());
    for option in control.options() {
        let selected = if option == control.value() {
            " selected"
        } else {
            ""
        };
        let _ = write!(html, "<option{selected}>{}</option>", escape(option));
    }
    html.push_str("</select></label>");
    html
}

/// Keeps JSON from closing the `<script>` element it is embedded in.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const INLINE_CSS: &str = r"
body { margin: 0; font-family: sans-serif; }
.controls { display: flex; gap: 1em; padding: 0.5em 1em; align-items: center; }
#map { width: 100%; height: 60vh; }
#results { padding: 0 1em 1em; }
#results table { border-collapse: collapse; }
#results th, #results td { border: 1px solid #ccc; padding: 0.2em 0.6em; text-align: left; }
.marker { width: 14px; height: 14px; border-radius: 50%; border: 1px solid #333; cursor: pointer; }
.placeholder { color: #666; }
";

const INLINE_JAVASCRIPT: &str = r"
const data = JSON.parse(document.getElementById('page-data').textContent);
const results = document.getElementById('results');

mapboxgl.accessToken = data.accessToken || '';
const map = new mapboxgl.Map({
    container: 'map',
    style: data.style,
    center: data.center,
    zoom: data.zoom,
});

let active = null;
let hover = null;

function hideHover() {
    if (hover) { hover.remove(); hover = null; }
}

function hidePopups() {
    hideHover();
    if (active && active.popup) active.popup.remove();
    active = null;
}

function showPopup(id, lngLat) {
    const panel = data.panels[id];
    return new mapboxgl.Popup({
        anchor: 'bottom',
        closeButton: false,
        closeOnClick: false,
        offset: panel.offset,
    })
        .setLngLat(lngLat)
        .setText(panel.popup)
        .addTo(map);
}

for (const feature of data.markers.features) {
    const id = feature.properties.id;
    const lngLat = feature.geometry.coordinates;
    const el = document.createElement('div');
    el.className = 'marker';
    el.style.background = feature.properties.color;

    el.addEventListener('mouseenter', () => {
        hideHover();
        if (active && active.id === id) {
            if (!active.popup) active.popup = showPopup(id, lngLat);
            return;
        }
        if (active && active.popup) { active.popup.remove(); active.popup = null; }
        hover = showPopup(id, lngLat);
    });
    el.addEventListener('mouseleave', () => {
        if (!hover) return;
        hideHover();
        if (active && !active.popup) active.popup = showPopup(active.id, active.lngLat);
    });
    el.addEventListener('click', (event) => {
        event.stopPropagation();
        hidePopups();
        active = { id, lngLat, popup: showPopup(id, lngLat) };
        results.innerHTML = data.panels[id].html;
    });

    new mapboxgl.Marker({ element: el }).setLngLat(lngLat).addTo(map);
}

map.on('click', () => {
    hidePopups();
    results.innerHTML = data.placeholder;
});
";
