//! agglo core library.
//!
//! Agglomerative hierarchical clustering over a fixed distance matrix. The
//! [`Agglomerator`] repeatedly merges the closest pair of clusters under a
//! [`Linkage`] rule and records every step as a [`TraceRecord`], producing a
//! full dendrogram [`Trace`].
//!
//! The original [`DistanceMatrix`] is immutable; each step derives a fresh
//! [`WorkingMatrix`] of inter-cluster distances from it.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cluster;
mod engine;
mod error;
mod labels;
mod linkage;
mod matrix;
mod trace;

pub use crate::{
    builder::AgglomeratorBuilder,
    cluster::Cluster,
    engine::{Agglomerator, ClusteringState, NearestPair, Phase, run_linkages},
    error::{AggloError, AggloErrorCode, MatrixError, MatrixErrorCode, Result},
    labels::Labels,
    linkage::{FallbackPolicy, Linkage, inter_cluster_distance, try_inter_cluster_distance},
    matrix::{DistanceMatrix, WorkingMatrix},
    trace::{LinkageRow, MergeEvent, Trace, TraceRecord},
};
