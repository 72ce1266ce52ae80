//! # beam_core - Beam Statics Engine
//!
//! `beam_core` computes support reactions, shear force diagrams (SFD) and
//! bending moment diagrams (BMD) for straight, statically determinate beams.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Closed-form first**: every built-in load kind has an analytic resultant
//!   at any cut; only user formulas are integrated numerically
//! - **No hidden state**: the solver returns reactions instead of writing them
//!   into joints, and custom-load caches are explicit [`loads::EffectTable`]s
//! - **Rich Errors**: every failure is a structured [`BeamError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::{AnalysisSettings, Beam, Joint, Load};
//!
//! let beam = Beam::new(4.0)
//!     .unwrap()
//!     .with_joint(Joint::fixed(0.0))
//!     .with_load(Load::uniform(0.0, 4.0, 2.0));
//!
//! let solved = beam.verify(&AnalysisSettings::default()).unwrap();
//! let fixed = solved.reaction_of(&beam.joints()[0]);
//! assert_eq!(fixed.ry, 8.0);
//! assert_eq!(fixed.rm, 16.0);
//!
//! let diagrams = solved.sweep();
//! assert_eq!(diagrams.sfd.len(), 4001);
//! ```
//!
//! ## Modules
//!
//! - [`beam`] - Beam container, verification and the diagram sweep
//! - [`loads`] - Load kinds and their resultants
//! - [`joints`] - Supports and reactions
//! - [`solver`] - Equilibrium solver
//! - [`effect`] - Force/moment pair produced at a cut
//! - [`input`] - Raw input records and model files
//! - [`settings`] - Sweep and quadrature settings
//! - [`errors`] - Structured error types

pub mod beam;
pub mod effect;
pub mod errors;
pub mod input;
pub mod joints;
pub mod loads;
pub mod settings;
pub mod solver;

// Re-export commonly used types at crate root for convenience
pub use beam::{Beam, BeamReport, DiagramPoint, Diagrams, SolvedBeam};
pub use effect::LoadEffect;
pub use errors::{BeamError, BeamResult};
pub use input::BeamModel;
pub use joints::{Joint, JointId, JointKind, Reaction, Reactions};
pub use loads::{Load, LoadKind};
pub use settings::AnalysisSettings;
pub use solver::solve_reactions;
