//! View synchronization and animation orchestration
//!
//! Everything here observes the model and never mutates it:
//! - Bindings are rebuilt wholesale per stage
//! - Bindings are processed in stable insertion order
//! - Timed work only moves forward inside an explicit frame tick

pub mod anim;
pub mod effects;
pub mod layout;
pub mod proxy;
pub mod registry;
pub mod sync;
pub mod transform;
pub mod tween;
pub mod world;

pub use effects::{EffectKind, EffectPlan, EffectSprite, FeedbackAnimator};
pub use layout::{Rect, StageLayoutController, WorldContainer};
pub use proxy::{EntityKind, EntityRef, ViewState, VisualProxy};
pub use registry::{EntityBinding, EntityViewRegistry};
pub use sync::{Quake, SyncReport, SynchronizationEngine, follow_decoy, quake_step};
pub use transform::CoordinateTransform;
pub use tween::{Delay, Ease, Pose, Transition};
pub use world::GameWorldView;
