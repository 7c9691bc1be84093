// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Loopback demo: a session talks to an in-process fake renderer over a
//! framed duplex pipe, renders one frame and picks the world point under the
//! viewport center.
//!
//! Run with `RUST_LOG=debug` to see request and correlation traffic. Session
//! settings come from `client.json` in the user config directory, or in
//! `$VANTAGE_CONFIG_DIR` when set.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::DuplexStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vantage_client::port::{read_message, write_message};
use vantage_client::config::{ConfigService, FsConfigStore};
use vantage_client::{
    encode_raw_depth, spawn_framed, ClientConfig, FramedConnection, RenderOptions, SceneSession,
};
use vantage_geom::{BoundingBox, DVec3};
use vantage_proto::{self as proto, Message};
use vantage_scene::{Camera, Viewport};

const FRAME_PX: u16 = 64;

fn v(x: f64, y: f64, z: f64) -> Option<proto::Vector3> {
    Some(proto::Vector3::new(x, y, z))
}

fn frame_for(sequence: u64, camera: proto::Camera, correlation_id: String) -> Message {
    let size = f64::from(FRAME_PX);
    let pixels = usize::from(FRAME_PX) * usize::from(FRAME_PX);
    Message::DrawFrame(proto::DrawFrame {
        sequence_number: Some(sequence),
        frame_correlation_ids: vec![correlation_id],
        image_attributes: Some(proto::ImageAttributes {
            frame_dimensions: Some(proto::Dimensions {
                width: size,
                height: size,
            }),
            image_rect: Some(proto::Rect {
                x: 0.0,
                y: 0.0,
                width: size,
                height: size,
            }),
            scale_factor: Some(1.0),
        }),
        scene_attributes: Some(proto::SceneAttributes {
            scene_view_id: Some("loopback".into()),
            camera: Some(camera),
            visible_bounding_box: Some(proto::BoundingBox {
                min: v(-1.0, -1.0, -1.0),
                max: v(1.0, 1.0, 1.0),
            }),
            cross_sectioning: None,
            has_changed: true,
        }),
        image: Some(vec![0; pixels * 4]),
        depth_buffer: Some(encode_raw_depth(&vec![u16::MAX / 4; pixels])),
    })
}

/// Answers camera replacements with a flat depth frame and every pick with
/// one hit on the front face of the unit cube.
async fn fake_renderer(mut stream: DuplexStream) -> Result<()> {
    let mut ts = 0u64;
    while let Some((message, _)) = read_message(&mut stream).await? {
        ts += 1;
        let reply = match message {
            Message::ReplaceCamera(request) => {
                frame_for(ts, request.camera, request.frame_correlation_id)
            }
            Message::HitItems(request) => Message::HitItemsResult(proto::HitItemsResult {
                correlation_id: request.correlation_id,
                hits: vec![proto::Hit {
                    item_id: Some("cube".into()),
                    item_supplied_id: Some("cube-1".into()),
                    hit_point: v(0.0, 0.0, 1.0),
                    hit_normal: v(0.0, 0.0, 1.0),
                }],
            }),
            other => Message::Error(proto::ErrorPayload {
                correlation_id: other.correlation_id().map(str::to_string),
                code: 501,
                message: format!("{} is not supported here", other.op_name()),
            }),
        };
        write_message(&mut stream, &reply, ts).await?;
    }
    Ok(())
}

fn load_config() -> ClientConfig {
    match FsConfigStore::from_env() {
        Ok(store) => {
            info!(dir = %store.dir().display(), "reading client config");
            ClientConfig::load_or_default(&ConfigService::new(store))
        }
        Err(err) => {
            warn!(%err, "no config store; using defaults");
            ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let (client, server) = tokio::io::duplex(1 << 16);
    let renderer = tokio::spawn(fake_renderer(server));
    let FramedConnection {
        sender,
        inbound,
        reader,
        writer,
    } = spawn_framed(client);

    let config = load_config();
    info!(
        request_timeout = ?config.request_timeout(),
        snap_radius_px = config.snap_radius_px,
        "session settings"
    );
    let session = SceneSession::new(Arc::new(sender), config);
    let pump = session.attach(inbound);

    let bbox = BoundingBox::new(DVec3::splat(-1.0), DVec3::splat(1.0));
    let camera = Camera::perspective(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 1.0, bbox)?;
    let frame = session.render(&camera, RenderOptions::default()).await?;
    info!(
        sequence = frame.sequence_number,
        near = frame.camera().near(),
        far = frame.camera().far(),
        "frame received"
    );

    let viewport = Viewport::from_dimensions(frame.dimensions());
    let center = viewport.center();
    let depth = frame.depth_buffer().context("frame carried no depth")?;
    let world = viewport.transform_screen_point_to_world(center, depth, None);
    info!(?world, "world point under the viewport center");

    for hit in session.hit_items(center).await? {
        info!(item = %hit.item_id, point = ?hit.point, normal = ?hit.normal, "hit");
    }

    // Dropping the session closes the outbound channel, which ends the
    // writer, which closes the pipe for the renderer.
    drop(session);
    writer.await??;
    renderer.await??;
    reader.await??;
    pump.await?;
    Ok(())
}
