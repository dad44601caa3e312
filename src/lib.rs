//! Rigport converts a humanoid character rig into a standardized avatar
//! interchange layout.
//!
//! The core is a non-destructive pipeline: an ordered sequence of
//! independent stages operating on a cloned scene graph, each reporting
//! everything it observes or changes through a tri-level notification log.
//! The caller-facing flow is:
//!
//! - Build an [`AvatarScene`] (or receive one from a host integration)
//! - Run [`convert`], or assemble a [`Pipeline`] and [`ExportContext`]
//!   by hand for custom stage sets
//! - Inspect the [`PipelineReport`] and hand the finished
//!   [`ExportArtifacts`] to an [`AvatarExporter`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod export;
pub mod pipeline;
pub mod scene;
pub mod stages;

pub use crate::foundation::error::{RigportError, RigportResult};
pub use crate::foundation::ids::{MaterialId, MeshId, NodeIdx};

pub use crate::export::{AvatarExporter, ExportArtifacts, JsonMetadataExporter, convert};
pub use crate::pipeline::context::{ExportContext, StageExchange, TargetVersion};
pub use crate::pipeline::notify::{
    Notification, PipelineReport, Severity, StageReport, StageRun,
};
pub use crate::pipeline::runner::Pipeline;
pub use crate::pipeline::stage::Stage;
pub use crate::scene::avatar::AvatarScene;
pub use crate::scene::bones::{BoneRole, BoneTable};
pub use crate::scene::dynamics::{FieldValue, LooseComponent, SpringBone, SpringBoneGroup};
pub use crate::scene::expressions::{ExpressionMap, ExpressionPreset, MorphBinding};
pub use crate::scene::material::{Material, MaterialStore, Rgba, TextureRef};
pub use crate::scene::mesh::{Mesh, MeshStore, MorphTarget, Skin};
pub use crate::scene::model::{SceneGraph, SceneNode, Transform};
