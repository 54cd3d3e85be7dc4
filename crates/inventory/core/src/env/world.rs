use crate::types::{OwnerId, Placement, RepresentationId, RepresentationKind};

/// The external scene that instantiates and tears down representation objects.
///
/// The core decides *whether* and *for whom* a representation exists; the
/// world decides how. Both calls are opaque and may fail: an absent handle
/// from `create_representation` is a valid, non-fatal outcome.
///
/// Implementations use interior mutability; the core only ever holds a
/// shared reference.
pub trait World: Send + Sync {
    /// Instantiates a representation of `kind`, logically parented to
    /// `owner` and positioned at `placement`. Returns `None` when the world
    /// declines.
    fn create_representation(
        &self,
        kind: RepresentationKind,
        owner: OwnerId,
        placement: Placement,
    ) -> Option<RepresentationId>;

    /// Requests destruction of a live representation. Returns whether the
    /// world knew the handle.
    fn destroy_representation(&self, representation: RepresentationId) -> bool;

    /// Current placement of an owner, if the world tracks one.
    fn owner_placement(&self, owner: OwnerId) -> Option<Placement>;
}
