// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use glam::DMat4;
use kurbo::Point;
use reslice_intersection::{PointerEvent, SliceIntersectionRepresentation};
use reslice_scene::{IntersectionMode, PlaneId, Scene, ViewPlane};
use reslice_widget::{InteractionEvent, SliceIntersectionWidget};

fn build_scene(others: usize) -> (Scene, PlaneId) {
    let mut scene = Scene::new();
    let axial = scene.add_plane(ViewPlane::new("Axial", (512, 512), 0.5));
    for i in 0..others {
        let angle = core::f64::consts::PI * i as f64 / others as f64;
        let pose =
            DMat4::from_rotation_z(angle) * DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2);
        let id = scene.add_plane(
            ViewPlane::new(format!("Oblique {i}"), (512, 512), 0.5).with_slice_to_world(pose),
        );
        scene
            .update_display_settings(id, |s| s.intersection_mode = IntersectionMode::FullLines)
            .unwrap();
    }
    (scene, axial)
}

/// Pointer positions on a coarse grid over the view.
fn grid() -> Vec<PointerEvent> {
    (0..16_u8)
        .flat_map(|i| (0..16_u8).map(move |j| (i, j)))
        .map(|(i, j)| {
            PointerEvent::at_display(Point::new(
                f64::from(i) * 32.0 + 3.0,
                f64::from(j) * 32.0 + 5.0,
            ))
        })
        .collect()
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("reslice_hit_test");
    group.sample_size(50);
    let pointers = grid();

    for &others in &[2_usize, 8] {
        let (mut scene, axial) = build_scene(others);
        let mut representation = SliceIntersectionRepresentation::default();
        representation.set_current_plane(&mut scene, Some(axial));

        group.bench_function(format!("can_interact_grid(others={others})"), |b| {
            b.iter(|| {
                for pointer in &pointers {
                    black_box(representation.can_interact(&scene, pointer));
                }
            });
        });
        representation.detach(&mut scene);
    }

    group.bench_function("widget_hover_sweep(others=2)", |b| {
        b.iter_batched(
            || {
                let (mut scene, axial) = build_scene(2);
                let mut widget = SliceIntersectionWidget::default();
                widget.set_current_plane(&mut scene, Some(axial));
                (scene, widget)
            },
            |(mut scene, mut widget)| {
                for pointer in &pointers {
                    widget.process_event(&mut scene, &InteractionEvent::PointerMove(*pointer));
                }
                widget.detach(&mut scene);
                black_box(scene)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_hit_test);
criterion_main!(benches);
