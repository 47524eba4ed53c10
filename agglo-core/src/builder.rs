//! Builder utilities for configuring agglomerative clustering runs.
//!
//! Exposes linkage and fallback-policy selection and the validation applied
//! before constructing [`Agglomerator`] instances.

use std::sync::Arc;

use crate::{
    Result,
    engine::Agglomerator,
    error::AggloError,
    linkage::{FallbackPolicy, Linkage},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkageChoice {
    Method(Linkage),
    Tag(String),
}

/// Configures and constructs [`Agglomerator`] instances.
///
/// # Examples
/// ```
/// use agglo_core::{AgglomeratorBuilder, FallbackPolicy, Linkage};
///
/// let agglomerator = AgglomeratorBuilder::new()
///     .with_linkage(Linkage::Complete)
///     .with_fallback_policy(FallbackPolicy::FailFast)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(agglomerator.linkage(), Linkage::Complete);
/// assert_eq!(agglomerator.fallback_policy(), FallbackPolicy::FailFast);
/// ```
#[derive(Debug, Clone)]
pub struct AgglomeratorBuilder {
    linkage: LinkageChoice,
    fallback_policy: FallbackPolicy,
}

impl Default for AgglomeratorBuilder {
    fn default() -> Self {
        Self {
            linkage: LinkageChoice::Method(Linkage::Average),
            fallback_policy: FallbackPolicy::Legacy,
        }
    }
}

impl AgglomeratorBuilder {
    /// Creates a builder using average linkage and the legacy fallback policy.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AgglomeratorBuilder, FallbackPolicy};
    ///
    /// let builder = AgglomeratorBuilder::new();
    /// assert_eq!(builder.fallback_policy(), FallbackPolicy::Legacy);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the linkage method.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = LinkageChoice::Method(linkage);
        self
    }

    /// Selects the linkage method by tag; the tag is resolved against the
    /// fallback policy when [`Self::build`] runs.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AgglomeratorBuilder, Linkage};
    ///
    /// let agglomerator = AgglomeratorBuilder::new()
    ///     .with_linkage_tag("single")
    ///     .build()
    ///     .expect("tag is known");
    /// assert_eq!(agglomerator.linkage(), Linkage::Single);
    /// ```
    #[must_use]
    pub fn with_linkage_tag(mut self, tag: impl Into<String>) -> Self {
        self.linkage = LinkageChoice::Tag(tag.into());
        self
    }

    /// Sets how unusable inputs are handled.
    #[must_use]
    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    /// Returns the configured fallback policy.
    #[must_use]
    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }

    /// Validates the configuration and constructs an [`Agglomerator`].
    ///
    /// # Errors
    /// Returns [`AggloError::UnknownLinkage`] when failing fast with an
    /// unrecognised tag or with [`Linkage::Degenerate`].
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AgglomeratorBuilder, FallbackPolicy};
    ///
    /// let err = AgglomeratorBuilder::new()
    ///     .with_linkage_tag("ward")
    ///     .with_fallback_policy(FallbackPolicy::FailFast)
    ///     .build()
    ///     .expect_err("ward is not supported");
    /// assert_eq!(err.code().as_str(), "AGGLO_UNKNOWN_LINKAGE");
    /// ```
    pub fn build(self) -> Result<Agglomerator> {
        let linkage = match self.linkage {
            LinkageChoice::Method(linkage) => linkage,
            LinkageChoice::Tag(tag) => Linkage::resolve(&tag, self.fallback_policy)?,
        };
        if linkage == Linkage::Degenerate && self.fallback_policy == FallbackPolicy::FailFast {
            return Err(AggloError::UnknownLinkage {
                tag: Arc::from(linkage.as_str()),
            });
        }
        Ok(Agglomerator::new(linkage, self.fallback_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn defaults_to_average_linkage() {
        let agglomerator = AgglomeratorBuilder::new().build().expect("defaults are valid");
        assert_eq!(agglomerator.linkage(), Linkage::Average);
        assert_eq!(agglomerator.fallback_policy(), FallbackPolicy::Legacy);
    }

    #[rstest]
    #[case::legacy_tag(
        AgglomeratorBuilder::new().with_linkage_tag("median"),
        Ok(Linkage::Degenerate)
    )]
    #[case::strict_tag(
        AgglomeratorBuilder::new()
            .with_linkage_tag("median")
            .with_fallback_policy(FallbackPolicy::FailFast),
        Err("AGGLO_UNKNOWN_LINKAGE")
    )]
    #[case::strict_degenerate(
        AgglomeratorBuilder::new()
            .with_linkage(Linkage::Degenerate)
            .with_fallback_policy(FallbackPolicy::FailFast),
        Err("AGGLO_UNKNOWN_LINKAGE")
    )]
    #[case::policy_set_after_tag(
        AgglomeratorBuilder::new()
            .with_fallback_policy(FallbackPolicy::FailFast)
            .with_linkage_tag("complete"),
        Ok(Linkage::Complete)
    )]
    fn build_resolves_linkage(
        #[case] builder: AgglomeratorBuilder,
        #[case] expected: core::result::Result<Linkage, &str>,
    ) {
        let outcome = builder
            .build()
            .map(|agglomerator| agglomerator.linkage())
            .map_err(|err| err.code().as_str());
        assert_eq!(outcome, expected);
    }
}
