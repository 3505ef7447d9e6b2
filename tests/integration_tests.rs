//! Feed-to-map scenarios exercised through the public API

use quakemap::prelude::*;

const FEED: &str = r#"{
    "type": "FeatureCollection",
    "metadata": {"generated": 1717200000000, "title": "USGS All Earthquakes, Past Week", "count": 4},
    "bbox": [-155.3, 19.2, -1.5, 142.4, 61.9, 412.0],
    "features": [
        {"type": "Feature", "id": "hv7400",
         "properties": {"mag": 2.5, "place": "5 km S of Volcano, Hawaii", "time": 1717171717000},
         "geometry": {"type": "Point", "coordinates": [-155.3, 19.2, 10.0]}},
        {"type": "Feature", "id": "ak0241",
         "properties": {"mag": 3.1, "place": "40 km W of Anchorage, Alaska", "time": 1717100000000},
         "geometry": {"type": "Point", "coordinates": [-150.6, 61.2, 45.5]}},
        {"type": "Feature", "id": "us7000",
         "properties": {"mag": 5.4, "place": "Izu Islands, Japan", "time": 1717000000000},
         "geometry": {"type": "Point", "coordinates": [142.4, 31.0, 412.0]}},
        {"type": "Feature", "id": "nc7310",
         "properties": {"mag": null, "place": "The Geysers, CA", "time": 1716900000000},
         "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, -1.5]}}
    ]
}"#;

fn feeds() -> LoadedFeeds {
    LoadedFeeds {
        earthquakes: Some(QuakeFeed::from_str(FEED).unwrap()),
        plates: None,
    }
}

fn earthquake_layer(map: &Map) -> &VectorLayer {
    map.layer_as::<VectorLayer>("earthquakes").unwrap()
}

#[test]
fn test_one_marker_per_feature_at_feature_coordinates() {
    let map = MapBuilder::default().build(&feeds()).unwrap();
    let layer = earthquake_layer(&map);

    assert_eq!(layer.marker_count(), 4);
    let positions: Vec<LatLng> = layer.markers().map(|m| m.position).collect();
    assert_eq!(
        positions,
        vec![
            LatLng::new(19.2, -155.3),
            LatLng::new(61.2, -150.6),
            LatLng::new(31.0, 142.4),
            LatLng::new(38.8, -122.8),
        ]
    );
}

#[test]
fn test_marker_paint_follows_depth_and_magnitude() {
    let map = MapBuilder::default().build(&feeds()).unwrap();
    let markers: Vec<&CircleMarker> = earthquake_layer(&map).markers().collect();

    assert_eq!(markers[0].style.radius, 10.0);
    assert_eq!(markers[0].style.fill_color, Color::from_hex("#66FF33").unwrap());
    assert_eq!(markers[1].style.fill_color, Color::from_hex("#FF6600").unwrap());
    assert_eq!(markers[2].style.fill_color, Color::from_hex("#FF0000").unwrap());
    assert_eq!(markers[0].style.stroke_color, Color::BLACK);
    assert_eq!(markers[0].style.fill_opacity, 0.6);

    // missing magnitude: the marker exists but is never drawn
    assert!(markers[3].style.radius.is_nan());
    assert!(!markers[3].style.is_drawable());
}

#[test]
fn test_popups_carry_place_and_time() {
    let map = MapBuilder::default().build(&feeds()).unwrap();
    let first = earthquake_layer(&map).markers().next().unwrap();
    let popup = first.popup.as_ref().unwrap();

    assert_eq!(popup.title, "5 km S of Volcano, Hawaii");
    assert_eq!(popup.body, vec!["Fri May 31 2024 16:08:37 UTC".to_string()]);
}

#[test]
fn test_empty_collection_builds_empty_layer() {
    let feeds = LoadedFeeds {
        earthquakes: Some(QuakeFeed::from_str(r#"{"type": "FeatureCollection", "features": []}"#).unwrap()),
        plates: None,
    };
    let map = MapBuilder::default().build(&feeds).unwrap();

    assert_eq!(earthquake_layer(&map).marker_count(), 0);
    assert!(map.depth_range().is_none());
}

#[test]
fn test_assembled_map_defaults() {
    let map = MapBuilder::default().build(&feeds()).unwrap();

    assert_eq!(map.viewport().center, LatLng::new(37.09, -95.71));
    assert_eq!(map.viewport().zoom, 5.0);

    let control = map.control();
    let bases: Vec<&str> = control.base_layers().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(bases, vec!["Street Map", "Topographic Map"]);
    assert_eq!(control.active_base_layer().unwrap().name, "Street Map");
    assert!(!control.collapsed);
    assert_eq!(control.overlay_checked("Earthquakes"), Some(true));

    assert_eq!(map.legend().unwrap().len(), 6);
    assert_eq!(map.depth_range(), Some(DepthRange { min: -1.5, max: 412.0 }));
}

#[test]
fn test_snapshot_describes_map() {
    let plates = GeoJson::from_str(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"LAYER": "plate", "Code": "PA"},
             "geometry": {"type": "Polygon", "coordinates": [[[-180, -10], [-120, -10], [-120, 40], [-180, -10]]]}}
        ]}"#,
    )
    .unwrap();
    let feeds = LoadedFeeds {
        plates: Some(plates),
        ..feeds()
    };
    let mut map = MapBuilder::default().build(&feeds).unwrap();
    map.set_overlay_visible("Tectonic Plates", true).unwrap();

    let snapshot = map.snapshot();
    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["active_base_layer"], "Street Map");
    assert_eq!(json["base_layers"].as_array().unwrap().len(), 2);
    assert_eq!(snapshot.overlay("Earthquakes").unwrap().options["marker_count"], 4);
    let plates = snapshot.overlay("Tectonic Plates").unwrap();
    assert!(plates.visible);
    assert_eq!(plates.options["polyline_count"], 1);
    assert_eq!(json["legend"]["entries"][5]["label"], "90+");
}

#[test]
fn test_switching_base_layer_changes_rendered_tiles() {
    let mut map = MapBuilder::default().build(&feeds()).unwrap();
    map.select_base_layer("Topographic Map").unwrap();

    let mut context = RenderContext::new(1024, 768);
    map.render(&mut context).unwrap();

    let tile_urls: Vec<&str> = context
        .drawing_queue()
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Tile { url, .. } => Some(url.as_str()),
            _ => None,
        })
        .collect();
    assert!(!tile_urls.is_empty());
    assert!(tile_urls.iter().all(|url| url.contains("opentopomap.org/5/")));
}

#[test]
fn test_click_hit_test_finds_marker() {
    let mut map = MapBuilder::default().build(&feeds()).unwrap();
    let anchorage = LatLng::new(61.2, -150.6);
    map.set_view(anchorage, 6.0);

    let pixel = map.viewport().lat_lng_to_pixel(&anchorage);
    let hit = map.marker_at(&Point::new(pixel.x + 3.0, pixel.y)).unwrap();
    assert_eq!(hit.id, "ak0241");

    map.pan(Point::new(200.0, 0.0));
    assert!(map.marker_at(&pixel).is_none());
}

#[test]
fn test_depth_color_properties() {
    assert_eq!(depth_color(10.0).to_hex(), "#66FF33");
    assert_eq!(depth_color(10.01).to_hex(), "#CADB2B");
    assert_eq!(magnitude_radius(2.5), 10.0);
}
