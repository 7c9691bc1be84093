// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Integration tests for vantage-geom primitives.

use proptest::prelude::*;
use vantage_geom::{BoundingBox, DVec3, Plane, Ray};

fn vec3() -> impl Strategy<Value = DVec3> {
    (-1e3f64..1e3, -1e3f64..1e3, -1e3f64..1e3).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #[test]
    fn union_contains_both_boxes(a in vec3(), b in vec3(), c in vec3(), d in vec3()) {
        let x = BoundingBox::new(a, b);
        let y = BoundingBox::new(c, d);
        let u = x.union(&y);
        for p in x.corners().iter().chain(y.corners().iter()) {
            prop_assert!(u.contains(*p));
        }
    }

    #[test]
    fn radius_is_never_zero(a in vec3(), b in vec3()) {
        prop_assert!(BoundingBox::new(a, b).radius() > 0.0);
        prop_assert!(BoundingBox::new(a, a).radius() > 0.0);
    }
}

#[test]
fn ray_hits_section_plane_at_offset() {
    let plane = Plane::from_normal_and_offset(DVec3::new(0.0, 0.0, 1.0), -2.0);
    let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -1.0));
    let hit = ray.intersect_plane(&plane).expect("ray should hit the plane");
    assert!((hit.z + 2.0).abs() < 1e-12);
    assert!(plane.signed_distance_to_point(hit).abs() < 1e-12);
}
