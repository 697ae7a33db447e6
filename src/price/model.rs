//! Home price regression model
//!
//! A linear regression over a fixed feature row whose column order matches
//! the training artifact: `[total_sqft, bath, bhk, <one-hot location...>]`.
//! The column list and the model weights ship as separate artifacts and must
//! stay in sync.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::round2;

/// Index of the first one-hot location column.
const LOCATION_OFFSET: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    weights: Array1<f64>,
    intercept: f64,
}

impl PriceModel {
    pub fn new(weights: Array1<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let model: Self = bincode::deserialize(&bytes)?;
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, row: &Array1<f64>) -> f64 {
        self.weights.dot(row) + self.intercept
    }
}

/// Column artifact: `{"data_columns": ["total_sqft", "bath", "bhk", ...]}`.
#[derive(Debug, Deserialize)]
struct ColumnsFile {
    data_columns: Vec<String>,
}

/// The loaded price model plus its column order.
#[derive(Debug)]
pub struct PriceEstimator {
    model: PriceModel,
    columns: Vec<String>,
}

impl PriceEstimator {
    pub fn new(model: PriceModel, columns: Vec<String>) -> Result<Self> {
        if columns.len() != model.n_features() {
            return Err(Error::InvalidModel(format!(
                "model has {} features, columns artifact lists {}",
                model.n_features(),
                columns.len()
            )));
        }
        if columns.len() < LOCATION_OFFSET {
            return Err(Error::InvalidModel(
                "columns artifact is missing the numeric columns".into(),
            ));
        }
        Ok(Self { model, columns })
    }

    pub fn load<P: AsRef<Path>>(model_path: P, columns_path: P) -> Result<Self> {
        let model = PriceModel::load(model_path)?;
        let file = File::open(columns_path)?;
        let columns: ColumnsFile = serde_json::from_reader(BufReader::new(file))?;
        Self::new(model, columns.data_columns)
    }

    /// Location names available for the one-hot block.
    pub fn locations(&self) -> &[String] {
        &self.columns[LOCATION_OFFSET..]
    }

    /// Estimate a price, rounded to 2 decimals.
    ///
    /// An unknown location leaves the one-hot block all zero; that is not an
    /// error, it just prices the property without a location premium.
    pub fn estimate(&self, location: &str, total_sqft: f64, bath: f64, bhk: f64) -> f64 {
        let mut row = Array1::zeros(self.columns.len());
        row[0] = total_sqft;
        row[1] = bath;
        row[2] = bhk;

        let wanted = location.trim().to_lowercase();
        if let Some(idx) = self.columns[LOCATION_OFFSET..]
            .iter()
            .position(|c| c == &wanted)
        {
            row[LOCATION_OFFSET + idx] = 1.0;
        }

        round2(self.model.predict(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn estimator() -> PriceEstimator {
        // price = 0.1 * sqft + 5 * bath + 10 * bhk + location bonus + 7
        let model = PriceModel::new(array![0.1, 5.0, 10.0, 20.0, 40.0], 7.0);
        let columns = vec![
            "total_sqft".to_string(),
            "bath".to_string(),
            "bhk".to_string(),
            "orangi town".to_string(),
            "clifton".to_string(),
        ];
        PriceEstimator::new(model, columns).unwrap()
    }

    #[test]
    fn one_hot_assembly_follows_column_order() {
        let est = estimator();
        let base = est.estimate("nowhere", 1000.0, 2.0, 3.0);
        assert_eq!(base, 147.0);
        assert_eq!(est.estimate("clifton", 1000.0, 2.0, 3.0), base + 40.0);
        assert_eq!(est.estimate("orangi town", 1000.0, 2.0, 3.0), base + 20.0);
    }

    #[test]
    fn location_matching_trims_and_lowercases() {
        let est = estimator();
        assert_eq!(
            est.estimate("  Clifton ", 1000.0, 2.0, 3.0),
            est.estimate("clifton", 1000.0, 2.0, 3.0)
        );
    }

    #[test]
    fn estimates_round_to_two_decimals() {
        let model = PriceModel::new(array![0.333, 0.0, 0.0], 0.0);
        let est = PriceEstimator::new(
            model,
            vec![
                "total_sqft".to_string(),
                "bath".to_string(),
                "bhk".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(est.estimate("x", 10.0, 0.0, 0.0), 3.33);
    }

    #[test]
    fn locations_skip_the_numeric_columns() {
        let est = estimator();
        assert_eq!(est.locations(), &["orangi town", "clifton"]);
    }

    #[test]
    fn column_count_mismatch_is_rejected() {
        let model = PriceModel::new(array![1.0, 2.0], 0.0);
        let err = PriceEstimator::new(model, vec!["a".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
    }

    #[test]
    fn roundtrips_through_artifact_files() {
        let dir = std::env::temp_dir();
        let model_path = dir.join(format!("price-model-{}.bin", std::process::id()));
        let columns_path = dir.join(format!("price-columns-{}.json", std::process::id()));

        PriceModel::new(array![0.1, 5.0, 10.0, 20.0], 7.0)
            .save(&model_path)
            .unwrap();
        std::fs::write(
            &columns_path,
            r#"{"data_columns": ["total_sqft", "bath", "bhk", "clifton"]}"#,
        )
        .unwrap();

        let est = PriceEstimator::load(&model_path, &columns_path).unwrap();
        std::fs::remove_file(&model_path).ok();
        std::fs::remove_file(&columns_path).ok();
        assert_eq!(est.locations(), &["clifton"]);
    }
}
