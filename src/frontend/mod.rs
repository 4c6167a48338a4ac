//! Front ends that turn source text into a [`crate::model::ModuleAnalysis`].
//!
//! `apidiff`'s core (model, similarity, matcher, classifier, walker, differ,
//! policy) is language-agnostic; everything in this module is the one
//! concrete collaborator that has to exist for the crate to be runnable
//! end-to-end (§4 addendum). A future front end for another declaration
//! language only needs to produce the same `ModuleAnalysis` shape.

pub mod ts;
