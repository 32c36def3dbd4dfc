// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three views of one volume: an axial view showing the lines of an oblique
//! plane and a coronal plane, hit tested at their crossing and moved together.

use glam::{DMat4, DVec3};
use kurbo::Point;
use reslice_intersection::{PointerEvent, SliceIntersectionRepresentation};
use reslice_scene::{
    ComponentType, IntersectionMode, PlaneId, Scene, SliceIntersectionFlags, ViewPlane,
};

const TILT: f64 = core::f64::consts::FRAC_PI_6;

struct Views {
    scene: Scene,
    axial: PlaneId,
    oblique: PlaneId,
    coronal: PlaneId,
}

/// The axial view is 200 x 200 pixels of 1 mm centred on the origin, so world
/// `(x, y, 0)` is pixel `(x + 100, y + 100)`.
///
/// The oblique plane passes through `(10, 0, 0)` with normal
/// `(cos 30°, sin 30°, 0)`; the coronal plane is `y = -20`. Their lines meet
/// where `cos 30° (x - 10) = 10`.
fn views() -> Views {
    let mut scene = Scene::new();
    let axial = scene.add_plane(ViewPlane::new("Red", (200, 200), 1.0));
    let oblique = scene.add_plane(ViewPlane::new("Yellow", (200, 200), 1.0).with_slice_to_world(
        DMat4::from_translation(DVec3::new(10.0, 0.0, 0.0))
            * DMat4::from_rotation_z(TILT)
            * DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2),
    ));
    let coronal = scene.add_plane(ViewPlane::new("Green", (200, 200), 1.0).with_slice_to_world(
        DMat4::from_translation(DVec3::new(0.0, -20.0, 0.0))
            * DMat4::from_rotation_x(core::f64::consts::FRAC_PI_2),
    ));
    for id in [axial, oblique, coronal] {
        scene
            .update_display_settings(id, |s| s.intersection_mode = IntersectionMode::FullLines)
            .unwrap();
    }
    Views {
        scene,
        axial,
        oblique,
        coronal,
    }
}

fn expected_crossing() -> DVec3 {
    DVec3::new(10.0 + 10.0 / TILT.cos() + 100.0, -20.0 + 100.0, 0.0)
}

#[test]
fn shared_disc_sits_at_the_crossing() {
    let Views {
        mut scene,
        axial,
        oblique,
        coronal,
    } = views();
    let mut representation = SliceIntersectionRepresentation::default();
    representation.set_current_plane(&mut scene, Some(axial));

    assert_eq!(representation.pipeline_count(), 2);
    assert!(representation.pipeline(oblique).unwrap().is_visible());
    assert!(representation.pipeline(coronal).unwrap().is_visible());

    let crossing = representation.slice_intersection_point();
    assert!(
        crossing.abs_diff_eq(expected_crossing(), 1e-6),
        "crossing = {crossing}"
    );
    assert_eq!(representation.compute_intersection_point(&scene), crossing);

    let hit = representation.can_interact(
        &scene,
        &PointerEvent::at_display(Point::new(crossing.x, crossing.y)),
    );
    assert_eq!(hit.component, ComponentType::TranslateIntersectingSlices);
    assert_eq!(hit.owner, Some(oblique));
    assert_eq!(hit.opacity, 1.0);

    representation.detach(&mut scene);
}

#[test]
fn moving_every_plane_notifies_each_once() {
    let Views {
        mut scene,
        axial,
        oblique,
        coronal,
    } = views();
    let mut representation = SliceIntersectionRepresentation::default();
    representation.set_current_plane(&mut scene, Some(axial));
    let watcher = scene.register_observer();
    scene.subscribe(watcher, oblique).unwrap();
    scene.subscribe(watcher, coronal).unwrap();

    representation.transform_intersecting_slices(
        &mut scene,
        DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)),
    );
    assert_eq!(scene.take_notifications(watcher), [oblique, coronal]);
    assert_eq!(scene.plane(axial).unwrap().origin(), DVec3::ZERO);

    // The coronal line runs along x, so only the oblique line moves the crossing.
    representation.process_notifications(&mut scene);
    let crossing = representation.slice_intersection_point();
    let expected = expected_crossing() + DVec3::new(5.0, 0.0, 0.0);
    assert!(crossing.abs_diff_eq(expected, 1e-6), "crossing = {crossing}");

    representation.detach(&mut scene);
}

#[test]
fn thick_slab_lines_flank_the_oblique_line() {
    let Views {
        mut scene,
        axial,
        oblique,
        ..
    } = views();
    scene
        .update_plane(oblique, |p| {
            p.slab.enabled = true;
            p.slab.thickness = 10.0;
        })
        .unwrap();
    scene
        .update_display_settings(axial, |s| {
            s.flags |= SliceIntersectionFlags::THICK_SLAB_VISIBLE
                | SliceIntersectionFlags::THICK_SLAB_INTERACTIVE;
        })
        .unwrap();

    let mut representation = SliceIntersectionRepresentation::default();
    representation.set_current_plane(&mut scene, Some(axial));
    let pipeline = representation.pipeline(oblique).unwrap();
    let line = pipeline.intersection_lines()[0];
    let slab = pipeline.thick_slab_lines().unwrap();
    assert!((slab[0].p0.distance(line.p0) - 5.0).abs() < 1e-9);
    assert!((slab[1].p0.distance(line.p0) - 5.0).abs() < 1e-9);
    assert!(slab[0].p0.distance(slab[1].p0) > 9.999);

    // The coronal plane has no slab.
    let coronal = representation
        .pipelines()
        .iter()
        .find(|p| p.other_plane() != oblique)
        .unwrap();
    assert!(coronal.thick_slab_lines().is_none());

    representation.detach(&mut scene);
}

#[test]
fn removed_plane_loses_its_pipeline() {
    let Views {
        mut scene,
        axial,
        oblique,
        coronal,
    } = views();
    let mut representation = SliceIntersectionRepresentation::default();
    representation.set_current_plane(&mut scene, Some(axial));

    scene.remove_plane(coronal).unwrap();
    representation.process_notifications(&mut scene);
    assert_eq!(representation.pipeline_count(), 1);
    assert!(representation.pipeline(oblique).is_some());

    // A single line has nothing to cross: the view centre is used.
    assert_eq!(
        representation.slice_intersection_point(),
        DVec3::new(100.0, 100.0, 0.0)
    );

    scene.remove_plane(axial).unwrap();
    representation.process_notifications(&mut scene);
    assert_eq!(representation.current_plane(), None);
    assert_eq!(representation.pipeline_count(), 0);

    representation.detach(&mut scene);
}
