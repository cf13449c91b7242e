pub mod predictor;

pub use predictor::{Classification, Prediction, PredictorClient};
