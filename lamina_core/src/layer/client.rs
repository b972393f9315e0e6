// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client binding: the connection that owns a layer and the one-shot
//! surface handle given to it.

use core::fmt;

use super::{Layer, LayerId};

/// Identifies a client connection.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u32);

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

/// The handle a client uses to refer to its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    /// The layer behind the handle.
    pub layer: LayerId,
    /// The owning client.
    pub client: ClientId,
}

#[derive(Debug)]
pub(super) struct ClientBinding {
    client: ClientId,
    handed_out: bool,
}

impl ClientBinding {
    pub(super) const fn new(client: ClientId) -> Self {
        Self {
            client,
            handed_out: false,
        }
    }
}

impl Layer {
    /// The owning client, if the layer has one.
    #[must_use]
    pub fn client(&self) -> Option<ClientId> {
        self.client.as_ref().map(|c| c.client)
    }

    /// Returns `true` if the surface handle has been handed out.
    #[must_use]
    pub fn surface_handle_taken(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.handed_out)
    }

    /// Hands out the layer's surface handle.
    ///
    /// # Panics
    ///
    /// Panics if the layer has no client, or if the handle was already
    /// handed out. Two holders of one surface handle would break ownership
    /// of the layer.
    pub fn take_surface_handle(&mut self) -> SurfaceHandle {
        let id = self.id;
        let Some(binding) = self.client.as_mut() else {
            panic!("layer has no client binding");
        };
        assert!(
            !binding.handed_out,
            "surface handle has already been handed out"
        );
        binding.handed_out = true;
        SurfaceHandle {
            layer: id,
            client: binding.client,
        }
    }
}
