// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client side of a Vantage remote rendering session.
//!
//! A [`SceneSession`] sends camera, alteration, pick and stencil requests
//! through a [`RequestSender`] and matches the renderer's replies by
//! correlation id ([`CorrelationRequest`]). Inbound messages fan out over a
//! [`MessageBus`]; frames are decoded into `vantage_scene::Frame` values by
//! [`FrameDecoder`].

mod bus;
pub mod config;
mod decode;
mod dispatcher;
mod error;
pub mod mapping;
mod pixels;
pub mod port;
mod session;

pub use bus::{MessageBus, SubscriptionId};
pub use config::ClientConfig;
pub use decode::{decode_hits, FrameDecoder, HitResult};
pub use dispatcher::{CorrelationIds, CorrelationRequest, ListenerId, Pending};
pub use error::{ClientError, DecodeError};
pub use pixels::{encode_raw_depth, image_size, PixelDecoder, RawPixelDecoder, MAX_IMAGE_PIXELS};
pub use port::{spawn_framed, ChannelSender, FramedConnection, RequestSender};
pub use session::{RenderAnimation, RenderOptions, SceneSession};
