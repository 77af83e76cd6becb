//! Tests for K-means clustering.
//!
//! # Test Organization
//!
//! - `helpers` - Common test utilities and data generators
//! - `config_tests` - KMeansConfig validation tests
//! - `clustering_tests` - Main StandardKMeans clustering tests
//! - `edge_cases` - Fail-fast and boundary condition tests
//! - `silhouette_tests` - Silhouette coefficient tests
//! - `summary_tests` - Per-cluster summaries and sampling

mod helpers;
