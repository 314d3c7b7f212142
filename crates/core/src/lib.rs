pub mod centroid;
pub mod cluster;
pub mod config;
pub mod dirs;
pub mod engine;
pub mod error;
pub mod model;
pub mod ngram;
pub mod profile;
pub mod prompt;
pub mod store;
pub mod train;
pub mod vector;
pub mod vocabulary;

pub use centroid::{Centroid, compute_centroid};
pub use cluster::Cluster;
pub use config::{ClusteringConfig, Config, LoggingConfig, StorageConfig};
pub use self::dirs::{default_config_dir, default_data_dir, default_models_dir};
pub use engine::{Assignment, Classification, ClusterEngine, Decision, UNRECOGNIZED, validate_threshold};
pub use error::{Error, Result};
pub use model::FORMAT_VERSION;
pub use ngram::{extract_ngrams, ngrams, tokenize};
pub use profile::FrequencyProfile;
pub use prompt::{FixedLabel, LabelPrompt, NoPrompt};
pub use store::ModelStore;
pub use train::{FileReport, TrainingReport, label_for_path, train_from_files, train_into, train_text};
pub use vector::{SparseTerms, euclidean, vectorize};
pub use vocabulary::Vocabulary;
