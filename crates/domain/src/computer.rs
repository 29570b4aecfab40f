//! Map-state computation
//!
//! Maps a resolved explore state into floor positions/visibility/LOD,
//! building-model visibility, and a camera target. Deterministic; the
//! only renderer access is through the read-only [`MapQuery`].

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::DomainError;
use crate::explore::{CameraPosition, ExploreState, ResolvedExploreState, ViewMode};
use crate::geometry::Point3;
use crate::layout::{Building, Floor, VenueLayout};
use crate::map_state::{
    CameraConfig, Durations, LayerConfig, Lod, Manipulator, MapQuery, MapState, Padding,
    ViewpointFit,
};

/// Camera policy for one view mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePolicy {
    /// Camera pitch in degrees.
    pub pitch: f64,
    /// Fit padding as a fraction of each viewport dimension.
    pub padding_factor: f64,
}

/// Tuning and feature flags for the map-state computer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub global: ModePolicy,
    pub building: ModePolicy,
    pub floor: ModePolicy,
    /// Show only the exact target floor instead of the stack below it
    /// (reduced renderers that cannot stack floors).
    pub single_floor_rendering: bool,
    /// Multifloor stack compatibility: all floors in building mode,
    /// only the target in floor mode, content kept on at forced LOD,
    /// directional far-parking, initial-position camera fallback.
    pub multifloor_compat: bool,
    /// Stack height layers are teleported to before being hidden.
    pub far_away_height: f64,
    /// Camera position captured at startup; compatibility-mode camera
    /// fallback when no footprint exists.
    pub initial_camera_position: Option<CameraPosition>,
    pub durations: Durations,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            global: ModePolicy {
                pitch: -50.0,
                padding_factor: 0.0,
            },
            building: ModePolicy {
                pitch: -20.0,
                padding_factor: 0.1,
            },
            floor: ModePolicy {
                pitch: -50.0,
                padding_factor: 0.1,
            },
            single_floor_rendering: false,
            multifloor_compat: false,
            far_away_height: 750.0,
            initial_camera_position: None,
            durations: Durations::default(),
        }
    }
}

impl MapConfig {
    pub fn policy(&self, mode: ViewMode) -> ModePolicy {
        match mode {
            ViewMode::Global => self.global,
            ViewMode::Building => self.building,
            ViewMode::Floor => self.floor,
        }
    }
}

/// Compute the map state realizing `resolved`.
///
/// `current` is the still-persisted previous state; it only influences
/// the floor animation duration (discontinuous transitions snap).
pub fn compute(
    resolved: &ResolvedExploreState,
    current: &ExploreState,
    layout: &VenueLayout,
    config: &MapConfig,
    query: &dyn MapQuery,
) -> Result<MapState, DomainError> {
    let target = lookup_target(resolved, layout)?;
    let mode = resolved.mode;

    if mode != ViewMode::Global && target.is_none() {
        return Err(DomainError::inconsistent(format!(
            "{mode} mode without a resolved building and floor"
        )));
    }

    let mut durations = config.durations;
    // A global -> floor or cross-building floor -> floor jump is a
    // context change; a long stack slide would just be noise.
    if mode == ViewMode::Floor
        && (current.mode == ViewMode::Global
            || (current.mode == ViewMode::Floor && current.building != resolved.building))
    {
        durations.floor = Duration::ZERO;
    }

    let mut layers = BTreeMap::new();
    if let Some(global_id) = layout.global_layer() {
        layers.insert(
            global_id.clone(),
            global_layer_config(mode, target.map(|(_, f)| f), config),
        );
    }

    for building in layout.buildings() {
        let is_target_building = Some(building.id()) == resolved.building.as_ref();
        for floor in building.floors() {
            let layer = match (mode, target) {
                (ViewMode::Global, _) | (_, None) => parked_for_global(floor, config),
                (_, Some((_, target_floor))) => {
                    if is_target_building {
                        target_building_layer(mode, floor, target_floor, config)
                    } else {
                        other_building_layer(floor, target_floor, config)
                    }
                }
            };
            layers.insert(floor.id().clone(), layer);
        }
    }

    // In global mode all building models show; otherwise the target
    // building's floors replace its model.
    let building_models = layout
        .buildings()
        .iter()
        .map(|building| {
            let visible =
                mode == ViewMode::Global || Some(building.id()) != resolved.building.as_ref();
            (building.id().clone(), visible)
        })
        .collect();

    let camera = if resolved.no_viewpoint {
        None
    } else {
        Some(camera_config(resolved, layout, config, query))
    };

    Ok(MapState {
        target_level_index: target.map(|(_, floor)| floor.level_index()),
        layers,
        camera,
        building_models,
        manipulator: if mode == ViewMode::Building {
            Manipulator::Custom
        } else {
            Manipulator::Map
        },
        durations,
    })
}

fn lookup_target<'a>(
    resolved: &ResolvedExploreState,
    layout: &'a VenueLayout,
) -> Result<Option<(&'a Building, &'a Floor)>, DomainError> {
    let Some(building_id) = &resolved.building else {
        return Ok(None);
    };
    let building = layout
        .building(building_id)
        .ok_or_else(|| DomainError::unknown("building", building_id.as_str()))?;
    let floor_id = resolved
        .floor
        .as_ref()
        .ok_or_else(|| DomainError::inconsistent("building set without a floor"))?;
    let floor = building
        .floor(floor_id)
        .ok_or_else(|| DomainError::unknown("floor", floor_id.as_str()))?;
    Ok(Some((building, floor)))
}

fn global_layer_config(
    mode: ViewMode,
    target_floor: Option<&Floor>,
    config: &MapConfig,
) -> LayerConfig {
    match (mode, target_floor) {
        (ViewMode::Global, _) | (_, None) => LayerConfig {
            lod: Lod::Auto,
            position: Point3::default(),
            visible: true,
            immediate_visible: None,
        },
        (_, Some(floor)) if floor.level_index() >= 0 => LayerConfig {
            lod: Lod::Auto,
            // Parked so the target floor sits at z = 0 above it.
            position: Point3::at_height(-floor.ground_stack_height()),
            visible: true,
            immediate_visible: None,
        },
        _ => LayerConfig {
            lod: Lod::Auto,
            position: Point3::at_height(config.far_away_height),
            visible: false,
            immediate_visible: None,
        },
    }
}

/// Global mode: floors at or below ground park near their resting
/// height, floors above park far away. All hidden, immediately.
fn parked_for_global(floor: &Floor, config: &MapConfig) -> LayerConfig {
    let z = if floor.level_index() <= 0 {
        floor.ground_stack_height()
    } else {
        config.far_away_height
    };
    LayerConfig {
        lod: Lod::Auto,
        position: Point3::at_height(z),
        visible: false,
        immediate_visible: Some(false),
    }
}

fn target_building_layer(
    mode: ViewMode,
    floor: &Floor,
    target_floor: &Floor,
    config: &MapConfig,
) -> LayerConfig {
    let is_exact_target = floor.level_index() == target_floor.level_index();

    let mut visible = if config.single_floor_rendering {
        is_exact_target
    } else {
        // The target floor plus the stack below it.
        floor.level_index() <= target_floor.level_index()
    };
    if config.multifloor_compat {
        visible = if mode == ViewMode::Building {
            true
        } else {
            is_exact_target
        };
    }

    if visible {
        let mut lod = if is_exact_target {
            Lod::Auto
        } else {
            Lod::Level(0)
        };
        if config.multifloor_compat {
            lod = if mode == ViewMode::Building {
                Lod::Level(0)
            } else {
                Lod::Auto
            };
        }
        LayerConfig {
            lod,
            position: Point3::at_height(
                floor.ground_stack_height() - target_floor.ground_stack_height(),
            ),
            visible: true,
            immediate_visible: None,
        }
    } else {
        let mut z = config.far_away_height;
        // Floors below the target leave downwards so they do not cross
        // the visible stack on their way out.
        if config.multifloor_compat && floor.level_index() < target_floor.level_index() {
            z = -z;
        }
        LayerConfig {
            lod: Lod::Auto,
            position: Point3::at_height(z),
            visible: false,
            immediate_visible: None,
        }
    }
}

fn other_building_layer(floor: &Floor, target_floor: &Floor, config: &MapConfig) -> LayerConfig {
    if floor.level_index() <= 0 {
        LayerConfig {
            lod: if floor.level_index() == target_floor.level_index() {
                Lod::Auto
            } else {
                Lod::Level(0)
            },
            position: Point3::at_height(
                floor.ground_stack_height() - target_floor.ground_stack_height(),
            ),
            visible: false,
            immediate_visible: None,
        }
    } else {
        LayerConfig {
            lod: Lod::Auto,
            position: Point3::at_height(config.far_away_height),
            visible: false,
            immediate_visible: None,
        }
    }
}

fn camera_config(
    resolved: &ResolvedExploreState,
    layout: &VenueLayout,
    config: &MapConfig,
    query: &dyn MapQuery,
) -> CameraConfig {
    let mode = resolved.mode;
    let policy = config.policy(mode);
    let mut camera = CameraConfig {
        position: None,
        pitch: Some(policy.pitch),
        heading: None,
    };

    if let Some(viewpoint) = &resolved.viewpoint {
        camera.position = Some(viewpoint.position);
        if let Some(heading) = viewpoint.heading {
            camera.heading = Some(heading);
        }
        if let Some(pitch) = viewpoint.pitch {
            camera.pitch = Some(pitch);
        }
        return camera;
    }

    let global_id = layout.global_layer().map(|id| id.as_str());
    let mut footprint = match (mode, resolved.building.as_ref()) {
        (ViewMode::Global, _) | (_, None) => global_id.and_then(|id| query.footprint(id)),
        (_, Some(building_id)) => query
            .footprint(building_id.as_str())
            .or_else(|| global_id.and_then(|id| query.footprint(id))),
    };
    let point_of_focus = match (mode, resolved.building.as_ref()) {
        (ViewMode::Global, _) | (_, None) => global_id.and_then(|id| query.point_of_focus(id)),
        (_, Some(building_id)) => query
            .point_of_focus(building_id.as_str())
            .or_else(|| global_id.and_then(|id| query.point_of_focus(id))),
    };

    // A requested place narrows the framing to its own footprint.
    if let Some(place) = &resolved.place {
        if let Some(place_footprint) = query.footprint(place.as_str()) {
            footprint = Some(place_footprint);
        }
    }

    if let Some(pof) = point_of_focus {
        camera.heading = Some(pof.heading_in_degrees);
    }

    if let Some(footprint) = footprint {
        let viewport = query.viewport();
        camera.position = query.fit_viewpoint(&ViewpointFit {
            points: footprint.points,
            padding: Padding {
                top: policy.padding_factor * viewport.height,
                bottom: policy.padding_factor * viewport.height,
                left: policy.padding_factor * viewport.width,
                right: policy.padding_factor * viewport.width,
            },
            pitch: camera.pitch.unwrap_or(policy.pitch),
            heading: camera.heading.unwrap_or_else(|| query.camera_heading()),
        });
    } else if config.multifloor_compat {
        if let Some(initial) = config.initial_camera_position {
            let mut position = initial;
            if mode == ViewMode::Floor {
                position.radius *= 0.75;
            }
            camera.position = Some(position);
        }
    }

    camera
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::{ExploreRequest, Viewpoint};
    use crate::geometry::{Footprint, Point2};
    use crate::map_state::{PointOfFocus, Viewport};
    use crate::resolver::{resolve, ResolveOptions};
    use crate::test_fixtures::{layout_with_global, places};
    use crate::ids::FloorId;

    /// Fixed footprints and POFs; fit echoes the first point plus the
    /// top padding as radius so tests can see which inputs were used.
    struct StubQuery;

    impl MapQuery for StubQuery {
        fn footprint(&self, id: &str) -> Option<Footprint> {
            match id {
                "outside" => Some(Footprint {
                    points: vec![Point2::new(0.0, 0.0), Point2::new(100.0, 100.0)],
                }),
                "B2" => Some(Footprint {
                    points: vec![Point2::new(10.0, 10.0), Point2::new(20.0, 20.0)],
                }),
                "shop" => Some(Footprint {
                    points: vec![Point2::new(42.0, 42.0), Point2::new(43.0, 43.0)],
                }),
                _ => None,
            }
        }

        fn point_of_focus(&self, id: &str) -> Option<PointOfFocus> {
            match id {
                "outside" => Some(PointOfFocus {
                    x: 50.0,
                    y: 50.0,
                    heading_in_degrees: 0.0,
                }),
                "B2" => Some(PointOfFocus {
                    x: 15.0,
                    y: 15.0,
                    heading_in_degrees: 90.0,
                }),
                _ => None,
            }
        }

        fn camera_heading(&self) -> f64 {
            33.0
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: 800.0,
                height: 600.0,
            }
        }

        fn fit_viewpoint(&self, fit: &ViewpointFit) -> Option<CameraPosition> {
            Some(CameraPosition {
                x: fit.points[0].x,
                y: fit.points[0].y,
                radius: fit.padding.top,
            })
        }
    }

    fn resolved_for(request: ExploreRequest, current: &ExploreState) -> ResolvedExploreState {
        resolve(
            &request,
            current,
            &layout_with_global(),
            &places(),
            ResolveOptions::default(),
        )
        .expect("resolves")
    }

    fn compute_for(
        request: ExploreRequest,
        current: &ExploreState,
        config: &MapConfig,
    ) -> MapState {
        let layout = layout_with_global();
        let resolved = resolved_for(request, current);
        compute(&resolved, current, &layout, config, &StubQuery).expect("computes")
    }

    fn layer<'a>(state: &'a MapState, id: &str) -> &'a LayerConfig {
        state.layers.get(&FloorId::from(id)).expect("layer present")
    }

    #[test]
    fn test_global_mode_layers() {
        let state = compute_for(
            ExploreRequest::mode(ViewMode::Global),
            &ExploreState::initial(),
            &MapConfig::default(),
        );

        let global = layer(&state, "outside");
        assert!(global.visible);
        assert_eq!(global.position, Point3::default());

        // ground and basement park near their resting height, hidden now
        let ground = layer(&state, "B2-F0");
        assert!(!ground.visible);
        assert_eq!(ground.immediate_visible, Some(false));
        assert_eq!(ground.position.z, 0.0);
        let basement = layer(&state, "B2-B1");
        assert_eq!(basement.position.z, -4.0);

        // floors above ground park far away
        let upper = layer(&state, "B2-F1");
        assert_eq!(upper.position.z, 750.0);
        assert!(!upper.visible);

        // all building models visible
        assert!(state.building_models.values().all(|&v| v));
        assert_eq!(state.manipulator, Manipulator::Map);
    }

    #[test]
    fn test_floor_mode_stack_below_and_including() {
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F0".into()),
            },
            &MapConfig::default(),
        );

        assert_eq!(state.target_level_index, Some(1));

        // target floor at z = 0, auto LOD
        let target = layer(&state, "B2-F1");
        assert!(target.visible);
        assert_eq!(target.position.z, 0.0);
        assert_eq!(target.lod, Lod::Auto);

        // floor below visible at its relative offset, forced lowest LOD
        let below = layer(&state, "B2-F0");
        assert!(below.visible);
        assert_eq!(below.position.z, -3.5);
        assert_eq!(below.lod, Lod::Level(0));

        // basement is part of the stack below the target
        let basement = layer(&state, "B2-B1");
        assert!(basement.visible);
        assert_eq!(basement.position.z, -4.0 - 3.5);

        // other building's ground floor parks near ground, hidden
        let other = layer(&state, "B1-F0");
        assert!(!other.visible);
        assert_eq!(other.position.z, 0.0 - 3.5);

        // global layer parked under the stack
        let global = layer(&state, "outside");
        assert!(global.visible);
        assert_eq!(global.position.z, -3.5);

        // target building model hidden, others shown
        let models = &state.building_models;
        assert_eq!(models.get(&crate::ids::BuildingId::from("B2")), Some(&false));
        assert_eq!(models.get(&crate::ids::BuildingId::from("B1")), Some(&true));
    }

    #[test]
    fn test_basement_target_hides_global_layer() {
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-B1"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F0".into()),
            },
            &MapConfig::default(),
        );
        let global = layer(&state, "outside");
        assert!(!global.visible);
        assert_eq!(global.position.z, 750.0);
    }

    #[test]
    fn test_single_floor_rendering_shows_only_target() {
        let config = MapConfig {
            single_floor_rendering: true,
            ..Default::default()
        };
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F0".into()),
            },
            &config,
        );
        assert!(layer(&state, "B2-F1").visible);
        assert!(!layer(&state, "B2-F0").visible);
        assert!(!layer(&state, "B2-B1").visible);
    }

    #[test]
    fn test_multifloor_compat_building_mode_shows_all_at_lod0() {
        let config = MapConfig {
            multifloor_compat: true,
            ..Default::default()
        };
        let state = compute_for(
            ExploreRequest::building(ViewMode::Building, "B2"),
            &ExploreState::initial(),
            &config,
        );
        for id in ["B2-B1", "B2-F0", "B2-F1"] {
            let floor = layer(&state, id);
            assert!(floor.visible, "{id} should be visible");
            assert_eq!(floor.lod, Lod::Level(0));
        }
        assert_eq!(state.manipulator, Manipulator::Custom);
    }

    #[test]
    fn test_multifloor_compat_floor_mode_parks_below_downwards() {
        let config = MapConfig {
            multifloor_compat: true,
            ..Default::default()
        };
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F1".into()),
            },
            &config,
        );
        assert!(layer(&state, "B2-F1").visible);
        assert_eq!(layer(&state, "B2-F1").lod, Lod::Auto);
        // floors below the target leave downwards
        assert_eq!(layer(&state, "B2-F0").position.z, -750.0);
        assert!(!layer(&state, "B2-F0").visible);
    }

    #[test]
    fn test_floor_duration_zeroed_on_discontinuous_transition() {
        let config = MapConfig::default();

        // global -> floor
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState::initial(),
            &config,
        );
        assert_eq!(state.durations.floor, Duration::ZERO);

        // cross-building floor -> floor
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B1-F0"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F0".into()),
            },
            &config,
        );
        assert_eq!(state.durations.floor, Duration::ZERO);

        // same-building floor -> floor keeps the slide
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState {
                mode: ViewMode::Floor,
                building: Some("B2".into()),
                floor: Some("B2-F0".into()),
            },
            &config,
        );
        assert_eq!(state.durations.floor, Duration::from_millis(700));
    }

    #[test]
    fn test_camera_fit_uses_building_footprint_and_pof() {
        let state = compute_for(
            ExploreRequest::floor(ViewMode::Floor, "B2-F1"),
            &ExploreState::initial(),
            &MapConfig::default(),
        );
        let camera = state.camera.expect("camera config");
        assert_eq!(camera.pitch, Some(-50.0));
        assert_eq!(camera.heading, Some(90.0));
        let position = camera.position.expect("fitted position");
        // B2's footprint starts at (10, 10); padding = 0.1 * 600
        assert_eq!(position.x, 10.0);
        assert_eq!(position.radius, 60.0);
    }

    #[test]
    fn test_camera_place_footprint_takes_precedence() {
        let state = compute_for(
            ExploreRequest::place("shop"),
            &ExploreState::initial(),
            &MapConfig::default(),
        );
        let camera = state.camera.expect("camera config");
        let position = camera.position.expect("fitted position");
        assert_eq!(position.x, 42.0);
    }

    #[test]
    fn test_camera_explicit_viewpoint_used_verbatim() {
        let mut request = ExploreRequest::floor(ViewMode::Floor, "B2-F1");
        request.viewpoint = Some(Viewpoint {
            position: CameraPosition {
                x: 1.0,
                y: 2.0,
                radius: 64.0,
            },
            pitch: Some(-80.0),
            heading: None,
        });
        let state = compute_for(request, &ExploreState::initial(), &MapConfig::default());
        let camera = state.camera.expect("camera config");
        assert_eq!(
            camera.position,
            Some(CameraPosition {
                x: 1.0,
                y: 2.0,
                radius: 64.0
            })
        );
        assert_eq!(camera.pitch, Some(-80.0));
        assert_eq!(camera.heading, None);
    }

    #[test]
    fn test_no_viewpoint_suppresses_camera() {
        let mut request = ExploreRequest::floor(ViewMode::Floor, "B2-F1");
        request.no_viewpoint = true;
        let state = compute_for(request, &ExploreState::initial(), &MapConfig::default());
        assert!(state.camera.is_none());
    }

    #[test]
    fn test_compat_initial_position_fallback_without_footprint() {
        let config = MapConfig {
            multifloor_compat: true,
            initial_camera_position: Some(CameraPosition {
                x: 5.0,
                y: 6.0,
                radius: 100.0,
            }),
            ..Default::default()
        };
        // B1 has no footprint of its own; drop the global fallback by
        // using a layout whose global layer has no footprint either.
        let layout = crate::test_fixtures::layout_without_global();
        let resolved = resolve(
            &ExploreRequest::floor(ViewMode::Floor, "B1-F0"),
            &ExploreState::initial(),
            &layout,
            &(),
            ResolveOptions::default(),
        )
        .expect("resolves");
        let state = compute(
            &resolved,
            &ExploreState::initial(),
            &layout,
            &config,
            &StubQuery,
        )
        .expect("computes");
        let camera = state.camera.expect("camera config");
        let position = camera.position.expect("fallback position");
        assert_eq!(position.x, 5.0);
        assert_eq!(position.radius, 75.0);
    }

    #[test]
    fn test_unknown_target_floor_is_an_error() {
        let layout = layout_with_global();
        let resolved = ResolvedExploreState {
            mode: ViewMode::Floor,
            building: Some("B2".into()),
            floor: Some("B1-F0".into()), // floor of another building
            place: None,
            viewpoint: None,
            no_viewpoint: false,
        };
        let err = compute(
            &resolved,
            &ExploreState::initial(),
            &layout,
            &MapConfig::default(),
            &StubQuery,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::UnknownReference { .. }));
    }
}
