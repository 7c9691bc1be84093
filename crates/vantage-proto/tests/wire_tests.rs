// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used)]
//! Packet framing against malformed and fragmented input.

use proptest::prelude::*;
use vantage_proto::wire::{decode_message, encode_message};
use vantage_proto::{
    Camera, DrawFrame, ImageAttributes, ItemOperations, ItemSelector, Message, Operand,
    OperationType, PerspectiveCamera, QueryExpression, Rect, SceneAlteration, SceneAttributes,
    SceneEvent, Vector3,
};

#[test]
fn scene_alteration_survives_framing() {
    let alteration = Message::SceneAlteration(SceneAlteration {
        scene_view_id: "view-1".into(),
        operations: vec![ItemOperations {
            query: QueryExpression::Not(Box::new(QueryExpression::Or(vec![
                QueryExpression::Operand(Operand::Item {
                    selector: ItemSelector::SuppliedId("bolt".into()),
                }),
                QueryExpression::Operand(Operand::Volume {
                    rectangle: Rect {
                        x: 1.0,
                        y: 2.0,
                        width: 30.0,
                        height: 40.0,
                    },
                    exclusive: true,
                }),
            ]))),
            operation_types: vec![
                OperationType::ChangeVisibility { visible: false },
                OperationType::ClearTransform { cascade: true },
            ],
        }],
        supplied_correlation_id: Some("alter-1".into()),
    });
    let bytes = encode_message(&alteration, 17).unwrap();
    let (decoded, ts, used) = decode_message(&bytes).unwrap();
    assert_eq!(decoded, alteration);
    assert_eq!(ts, 17);
    assert_eq!(used, bytes.len());
    assert_eq!(decoded.correlation_id(), Some("alter-1"));
}

#[test]
fn partial_frame_keeps_missing_fields_absent() {
    let frame = Message::DrawFrame(DrawFrame {
        sequence_number: Some(4),
        frame_correlation_ids: vec!["render-2".into()],
        image_attributes: Some(ImageAttributes::default()),
        scene_attributes: Some(SceneAttributes {
            camera: Some(Camera::from_perspective(PerspectiveCamera {
                position: Some(Vector3::new(0.0, 0.0, 5.0)),
                look_at: Some(Vector3::default()),
                up: None,
                fov_y: None,
            })),
            ..SceneAttributes::default()
        }),
        image: None,
        depth_buffer: Some(vec![0, 1, 2, 3]),
    });
    let (decoded, _, _) = decode_message(&encode_message(&frame, 0).unwrap()).unwrap();
    let Message::DrawFrame(decoded) = decoded else {
        panic!("expected a frame");
    };
    assert!(decoded.image.is_none());
    let camera = decoded.scene_attributes.unwrap().camera.unwrap();
    assert!(camera.orthographic.is_none());
    assert_eq!(camera.perspective.unwrap().up, None);
}

#[test]
fn events_expose_their_correlation() {
    let event = Message::Event(SceneEvent::SceneAlterationCompleted {
        correlation_id: Some("alter-9".into()),
        error: None,
    });
    let (decoded, _, _) = decode_message(&encode_message(&event, 3).unwrap()).unwrap();
    assert_eq!(decoded.correlation_id(), Some("alter-9"));
    assert_eq!(decoded.op_name(), "event");
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_message(&bytes);
    }
}
