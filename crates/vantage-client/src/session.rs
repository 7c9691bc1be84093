// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer session: correlated camera renders, scene alterations, picks
//! and stencil fetches over one [`MessageBus`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use vantage_geom::{DVec2, DVec3};
use vantage_proto::{self as proto, Message, SceneEvent};
use vantage_query::{compile_alteration, SceneOperation};
use vantage_scene::{
    Camera, FlyTo, FlyToOptions, FlyToTarget, Frame, StencilBuffer, Viewport,
};

use crate::bus::{MessageBus, SubscriptionId};
use crate::config::ClientConfig;
use crate::decode::{decode_hits, FrameDecoder, HitResult};
use crate::dispatcher::{CorrelationIds, CorrelationRequest};
use crate::mapping::{camera_to_wire, fly_to_to_wire, point_to_wire};
use crate::pixels::{PixelDecoder, RawPixelDecoder};
use crate::port::RequestSender;
use crate::ClientError;

/// How a render reaches the requested camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderAnimation {
    /// Jump straight to the camera.
    #[default]
    None,
    /// Animate using [`ClientConfig::fly_to_animation_ms`].
    Default,
    /// Animate over the given duration.
    Duration(Duration),
}

/// Options for [`SceneSession::render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Transition style.
    pub animation: RenderAnimation,
}

impl RenderOptions {
    /// Animated render with the configured default duration.
    pub fn animated() -> Self {
        Self {
            animation: RenderAnimation::Default,
        }
    }
}

/// One logical connection to a renderer.
///
/// Every request gets a fresh correlation id, so any number of renders,
/// alterations and picks may be in flight at once. The session also keeps
/// the most recent successfully decoded frame.
pub struct SceneSession {
    sender: Arc<dyn RequestSender>,
    bus: MessageBus,
    ids: CorrelationIds,
    config: ClientConfig,
    decoder: FrameDecoder,
    latest: Arc<Mutex<Option<Frame>>>,
    frame_subscription: SubscriptionId,
}

impl SceneSession {
    /// Session whose depth and stencil images arrive as raw pixels.
    pub fn new(sender: Arc<dyn RequestSender>, config: ClientConfig) -> Self {
        Self::with_pixel_decoder(sender, config, Arc::new(RawPixelDecoder))
    }

    /// Session that decodes depth and stencil containers with `pixels`.
    pub fn with_pixel_decoder(
        sender: Arc<dyn RequestSender>,
        config: ClientConfig,
        pixels: Arc<dyn PixelDecoder>,
    ) -> Self {
        let bus = MessageBus::new();
        let decoder = FrameDecoder::new(pixels);
        let latest = Arc::new(Mutex::new(None));
        let frame_subscription = {
            let decoder = decoder.clone();
            let latest = Arc::clone(&latest);
            bus.subscribe(move |message| {
                let Message::DrawFrame(draw) = message else {
                    return;
                };
                match decoder.decode_frame(draw) {
                    Ok(frame) => {
                        trace!(sequence = frame.sequence_number, "frame received");
                        *latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(frame);
                    }
                    Err(err) => warn!(%err, "discarding undecodable frame"),
                }
            })
        };
        Self {
            sender,
            bus,
            ids: CorrelationIds::new("vantage"),
            config,
            decoder,
            latest,
            frame_subscription,
        }
    }

    /// Inbound message bus. Transports publish replies here.
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Most recent frame that decoded cleanly.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Publishes every inbound message on the bus until the channel closes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(&self, mut inbound: UnboundedReceiver<Message>) -> JoinHandle<()> {
        let bus = self.bus.clone();
        tokio::spawn(async move {
            while let Some(message) = inbound.recv().await {
                bus.publish(&message);
            }
            debug!("inbound stream ended");
        })
    }

    /// Every decoded frame, for durable listeners.
    pub fn frames(&self) -> CorrelationRequest<Frame> {
        let decoder = self.decoder.clone();
        CorrelationRequest::new(
            &self.bus,
            "frames",
            self.config.request_timeout(),
            |m| matches!(m, Message::DrawFrame(_)),
            move |m| match m {
                Message::DrawFrame(draw) => decoder.decode_frame(draw),
                _ => Err(ClientError::Closed),
            },
        )
    }

    /// Asks the renderer for a frame seen through `camera` and waits for it.
    ///
    /// A transition queued with [`Camera::fly_to`], or an animated render,
    /// is sent as a fly-to; anything else replaces the camera outright.
    ///
    /// # Errors
    /// Send failures, [`ClientError::Server`] if the renderer rejects the
    /// request, decode failures of the answering frame, or a timeout.
    pub async fn render(&self, camera: &Camera, options: RenderOptions) -> Result<Frame, ClientError> {
        let id = self.ids.next_id();
        let animation = match options.animation {
            RenderAnimation::None => None,
            RenderAnimation::Default => Some(self.config.fly_to_animation()),
            RenderAnimation::Duration(duration) => Some(duration),
        };
        let message = match (camera.pending_fly_to(), animation) {
            (Some(pending), animation) => Message::FlyTo(fly_to_to_wire(
                &FlyTo {
                    target: pending.target.clone(),
                    animation: pending.animation.or(animation),
                },
                id.clone(),
            )),
            (None, Some(animation)) => Message::FlyTo(fly_to_to_wire(
                &FlyTo {
                    target: FlyToTarget::Camera(Box::new(camera.clone())),
                    animation: Some(animation),
                },
                id.clone(),
            )),
            (None, None) => Message::ReplaceCamera(proto::ReplaceCamera {
                camera: camera_to_wire(camera),
                frame_correlation_id: id.clone(),
            }),
        };
        let pending = self.frame_request(&id).once();
        self.send(message, &id)?;
        pending.wait().await
    }

    /// Queues `options` on `camera` and renders the transition.
    ///
    /// # Errors
    /// [`ClientError::Scene`] when `options` has no target, otherwise as
    /// [`SceneSession::render`].
    pub async fn fly_to(&self, camera: &Camera, options: FlyToOptions) -> Result<Frame, ClientError> {
        let queued = camera.fly_to(options)?;
        self.render(&queued, RenderOptions::default()).await
    }

    /// Applies `operations` to the scene view of the latest frame and waits
    /// until the renderer reports them applied.
    ///
    /// # Errors
    /// [`ClientError::NoFrame`] before the first frame,
    /// [`ClientError::Query`] for malformed operations, and
    /// [`ClientError::Server`] when the alteration fails remotely.
    pub async fn execute(&self, operations: &[SceneOperation]) -> Result<(), ClientError> {
        let scene_view_id = self
            .latest_frame()
            .map(|frame| frame.scene.scene_view_id)
            .ok_or(ClientError::NoFrame)?;
        let id = self.ids.next_id();
        let alteration = compile_alteration(scene_view_id, operations, Some(id.clone()))?;

        let expected = id.clone();
        let request = CorrelationRequest::new(
            &self.bus,
            format!("scene alteration {id}"),
            self.config.scene_alteration_timeout(),
            move |m| {
                m.correlation_id() == Some(expected.as_str())
                    && matches!(
                        m,
                        Message::Event(SceneEvent::SceneAlterationCompleted { .. })
                            | Message::Error(_)
                    )
            },
            |m| match m {
                Message::Event(SceneEvent::SceneAlterationCompleted { error: None, .. }) => Ok(()),
                Message::Event(SceneEvent::SceneAlterationCompleted {
                    error: Some(message),
                    ..
                }) => Err(ClientError::Server {
                    code: 0,
                    message: message.clone(),
                }),
                other => Err(server_error(other)),
            },
        );
        let pending = request.once();
        self.send(Message::SceneAlteration(alteration), &id)?;
        pending.wait().await
    }

    /// Asks the renderer which items lie under `point` (frame pixels).
    ///
    /// # Errors
    /// [`ClientError::InvalidHitResponse`] if any hit lacks an id, a point
    /// or a normal.
    pub async fn hit_items(&self, point: DVec2) -> Result<Vec<HitResult>, ClientError> {
        let id = self.ids.next_id();
        let pending = self
            .reply_request(&id, "hit items", |m| matches!(m, Message::HitItemsResult(_)), |m| {
                match m {
                    Message::HitItemsResult(result) => decode_hits(result),
                    other => Err(server_error(other)),
                }
            })
            .once();
        self.send(
            Message::HitItems(proto::HitItems {
                correlation_id: id.clone(),
                point: point_to_wire(point),
                include_metadata: false,
            }),
            &id,
        )?;
        pending.wait().await
    }

    /// Fetches the stencil image matching `frame`, bound to its depth.
    ///
    /// # Errors
    /// Decode failures when the reply lacks its image or no depth is
    /// available, plus the usual request failures.
    pub async fn stencil_buffer(&self, frame: &Frame) -> Result<StencilBuffer, ClientError> {
        let id = self.ids.next_id();
        let decoder = self.decoder.clone();
        let frame = frame.clone();
        let pending = self
            .reply_request(
                &id,
                "stencil buffer",
                |m| matches!(m, Message::StencilBufferResult(_)),
                move |m| match m {
                    Message::StencilBufferResult(result) => decoder.decode_stencil(result, &frame),
                    other => Err(server_error(other)),
                },
            )
            .once();
        self.send(
            Message::GetStencilBuffer(proto::GetStencilBuffer {
                correlation_id: id.clone(),
            }),
            &id,
        )?;
        pending.wait().await
    }

    /// Snaps `point` to the nearest stencil feature within the configured
    /// radius.
    pub fn snap(&self, stencil: &StencilBuffer, point: DVec2) -> DVec2 {
        stencil.snap_to_nearest_pixel(point, self.config.snap_radius_px)
    }

    /// Whether `world` is hidden in `frame`, using the configured tolerance.
    /// Frames without depth never occlude.
    pub fn is_occluded(&self, frame: &Frame, world: DVec3, viewport: &Viewport) -> bool {
        frame.depth_buffer().is_some_and(|depth| {
            depth.is_occluded_within(world, viewport, self.config.depth_tolerance)
        })
    }

    fn send(&self, message: Message, id: &str) -> Result<(), ClientError> {
        debug!(op = message.op_name(), correlation_id = id, "sending request");
        self.sender.send(message)
    }

    /// Frames naming `id`, or an error reply for it.
    fn frame_request(&self, id: &str) -> CorrelationRequest<Frame> {
        let decoder = self.decoder.clone();
        let expected = id.to_string();
        CorrelationRequest::new(
            &self.bus,
            format!("frame {id}"),
            self.config.request_timeout(),
            move |m| match m {
                Message::DrawFrame(draw) => draw.frame_correlation_ids.contains(&expected),
                Message::Error(e) => e.correlation_id.as_deref() == Some(expected.as_str()),
                _ => false,
            },
            move |m| match m {
                Message::DrawFrame(draw) => decoder.decode_frame(draw),
                other => Err(server_error(other)),
            },
        )
    }

    /// Replies accepted by `accept` echoing `id`, or an error reply for it.
    fn reply_request<T, A, F>(
        &self,
        id: &str,
        what: &str,
        accept: A,
        transform: F,
    ) -> CorrelationRequest<T>
    where
        T: Send + 'static,
        A: Fn(&Message) -> bool + Send + Sync + 'static,
        F: Fn(&Message) -> Result<T, ClientError> + Send + Sync + 'static,
    {
        let expected = id.to_string();
        CorrelationRequest::new(
            &self.bus,
            format!("{what} {id}"),
            self.config.request_timeout(),
            move |m| {
                m.correlation_id() == Some(expected.as_str())
                    && (accept(m) || matches!(m, Message::Error(_)))
            },
            transform,
        )
    }
}

impl Drop for SceneSession {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.frame_subscription);
    }
}

/// [`ClientError::Server`] for an error reply; [`ClientError::Closed`] for
/// anything a predicate should not have let through.
fn server_error(message: &Message) -> ClientError {
    match message {
        Message::Error(e) => ClientError::Server {
            code: e.code,
            message: e.message.clone(),
        },
        _ => ClientError::Closed,
    }
}
