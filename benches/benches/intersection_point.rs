// Copyright 2025 the Reslice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{DMat4, DVec3};
use reslice_intersection::SliceIntersectionRepresentation;
use reslice_scene::{IntersectionMode, PlaneId, Scene, ViewPlane};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        f64::from((self.0 >> 32) as u32) / f64::from(u32::MAX)
    }
}

/// An axial view plus `others` planes tilted about random vertical axes, all
/// passing near the volume centre.
fn build_scene(others: usize, seed: u64) -> (Scene, PlaneId) {
    let mut rng = Lcg(seed);
    let mut scene = Scene::new();
    let axial = scene.add_plane(ViewPlane::new("Axial", (512, 512), 0.5));
    for i in 0..others {
        let angle = rng.next_unit() * core::f64::consts::PI;
        let shift = DVec3::new(
            rng.next_unit() * 20.0 - 10.0,
            rng.next_unit() * 20.0 - 10.0,
            0.0,
        );
        let pose = DMat4::from_translation(shift)
            * DMat4::from_rotation_z(angle)
            * DMat4::from_rotation_y(core::f64::consts::FRAC_PI_2);
        let id = scene.add_plane(
            ViewPlane::new(format!("Oblique {i}"), (512, 512), 0.5).with_slice_to_world(pose),
        );
        scene
            .update_display_settings(id, |s| s.intersection_mode = IntersectionMode::FullLines)
            .unwrap();
    }
    (scene, axial)
}

fn bench_intersection_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("reslice_intersection");
    group.sample_size(50);

    for &others in &[2_usize, 8, 32] {
        let (mut scene, axial) = build_scene(others, 0x5EED_0000_0000_0001);
        let mut representation = SliceIntersectionRepresentation::default();
        representation.set_current_plane(&mut scene, Some(axial));

        group.bench_function(format!("intersection_point(others={others})"), |b| {
            b.iter(|| black_box(representation.compute_intersection_point(&scene)));
        });
        group.bench_function(format!("update_all(others={others})"), |b| {
            b.iter(|| {
                representation.update_all(&scene);
                black_box(representation.slice_intersection_point())
            });
        });

        representation.detach(&mut scene);
    }

    group.finish();
}

criterion_group!(benches, bench_intersection_point);
criterion_main!(benches);
