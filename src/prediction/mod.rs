pub mod annotate;
pub mod disease_catalog;
pub mod tiled_predictor;
