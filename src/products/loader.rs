//! CSV-based product loader
//!
//! Loads coefficient profiles and the state contribution schedule from CSV
//! files in data/products/

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use super::{
    Catalog, LifeInsuranceProfile, PensionProfile, ProfileStore, PropertyInsuranceProfile,
};
use crate::error::StoreError;
use crate::tiers::{Tier, TierSchedule};

/// Default path to the product data directory
pub const DEFAULT_PRODUCTS_PATH: &str = "data/products";

pub const LIFE_FILE: &str = "life_products.csv";
pub const PROPERTY_FILE: &str = "property_products.csv";
pub const PENSION_FILE: &str = "pension_products.csv";
pub const SCHEDULE_FILE: &str = "state_contributions.csv";

/// Raw CSV row matching life_products.csv columns
#[derive(Debug, Deserialize)]
struct LifeRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Death")]
    death: f64,
    #[serde(rename = "Injuries")]
    injuries: f64,
    #[serde(rename = "Diseases")]
    diseases: f64,
    #[serde(rename = "WorkIncapacity")]
    work_incapacity: f64,
    #[serde(rename = "Hospitalization")]
    hospitalization: f64,
    #[serde(rename = "Invalidity")]
    invalidity: f64,
    #[serde(rename = "SmokerPct")]
    smoker_pct: f64,
    #[serde(rename = "SportPct")]
    sport_pct: f64,
}

impl From<LifeRow> for LifeInsuranceProfile {
    fn from(row: LifeRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            death: row.death,
            injuries: row.injuries,
            diseases: row.diseases,
            work_incapacity: row.work_incapacity,
            hospitalization: row.hospitalization,
            invalidity: row.invalidity,
            smoker_pct: row.smoker_pct,
            sport_pct: row.sport_pct,
        }
    }
}

/// Raw CSV row matching property_products.csv columns
#[derive(Debug, Deserialize)]
struct PropertyRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "House")]
    house: f64,
    #[serde(rename = "Flat")]
    flat: f64,
    #[serde(rename = "Garage")]
    garage: f64,
    #[serde(rename = "Equipment")]
    equipment: f64,
    #[serde(rename = "Liability")]
    liability: f64,
}

impl From<PropertyRow> for PropertyInsuranceProfile {
    fn from(row: PropertyRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            house_per_m2: row.house,
            flat_per_m2: row.flat,
            garage_per_m2: row.garage,
            equipment_per_m2: row.equipment,
            liability_per_m2: row.liability,
        }
    }
}

/// Raw CSV row matching pension_products.csv columns
#[derive(Debug, Deserialize)]
struct PensionRow {
    #[serde(rename = "ProductId")]
    product_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Dynamic")]
    dynamic: f64,
    #[serde(rename = "Conservative")]
    conservative: f64,
    #[serde(rename = "Balanced")]
    balanced: f64,
}

impl From<PensionRow> for PensionProfile {
    fn from(row: PensionRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            dynamic_pct: row.dynamic,
            conservative_pct: row.conservative,
            balanced_pct: row.balanced,
        }
    }
}

/// Raw CSV row matching state_contributions.csv columns
#[derive(Debug, Deserialize)]
struct ScheduleRow {
    #[serde(rename = "UserContribution")]
    user_contribution: i64,
    #[serde(rename = "StateContribution")]
    state_contribution: i64,
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, StoreError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        rows.push(result?);
    }

    Ok(rows)
}

/// Reject rows without a product id; they could never be fetched
fn check_product_ids<'a>(
    file: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    for (i, id) in ids.enumerate() {
        if id.trim().is_empty() {
            return Err(StoreError::Parse {
                file: file.to_string(),
                message: format!("record {} has an empty product id", i + 1),
            });
        }
    }
    Ok(())
}

/// Load life insurance profiles from any reader
pub fn load_life_products_from_reader<R: Read>(reader: R) -> Result<Vec<LifeInsuranceProfile>, StoreError> {
    let rows: Vec<LifeRow> = read_rows(reader)?;
    check_product_ids(LIFE_FILE, rows.iter().map(|r| r.product_id.as_str()))?;
    Ok(rows.into_iter().map(LifeInsuranceProfile::from).collect())
}

/// Load property insurance profiles from any reader
pub fn load_property_products_from_reader<R: Read>(reader: R) -> Result<Vec<PropertyInsuranceProfile>, StoreError> {
    let rows: Vec<PropertyRow> = read_rows(reader)?;
    check_product_ids(PROPERTY_FILE, rows.iter().map(|r| r.product_id.as_str()))?;
    Ok(rows.into_iter().map(PropertyInsuranceProfile::from).collect())
}

/// Load pension profiles from any reader
pub fn load_pension_products_from_reader<R: Read>(reader: R) -> Result<Vec<PensionProfile>, StoreError> {
    let rows: Vec<PensionRow> = read_rows(reader)?;
    check_product_ids(PENSION_FILE, rows.iter().map(|r| r.product_id.as_str()))?;
    Ok(rows.into_iter().map(PensionProfile::from).collect())
}

/// Load the state contribution schedule from any reader
pub fn load_schedule_from_reader<R: Read>(reader: R) -> Result<TierSchedule, StoreError> {
    let rows: Vec<ScheduleRow> = read_rows(reader)?;
    Ok(TierSchedule::new(
        rows.into_iter()
            .map(|r| Tier::new(r.user_contribution, r.state_contribution))
            .collect(),
    ))
}

pub fn load_life_products(dir: &Path) -> Result<Vec<LifeInsuranceProfile>, StoreError> {
    load_life_products_from_reader(File::open(dir.join(LIFE_FILE))?)
}

pub fn load_property_products(dir: &Path) -> Result<Vec<PropertyInsuranceProfile>, StoreError> {
    load_property_products_from_reader(File::open(dir.join(PROPERTY_FILE))?)
}

pub fn load_pension_products(dir: &Path) -> Result<Vec<PensionProfile>, StoreError> {
    load_pension_products_from_reader(File::open(dir.join(PENSION_FILE))?)
}

pub fn load_schedule(dir: &Path) -> Result<TierSchedule, StoreError> {
    load_schedule_from_reader(File::open(dir.join(SCHEDULE_FILE))?)
}

/// Load a full catalog from the given directory
pub fn load_catalog(dir: &Path) -> Result<Catalog, StoreError> {
    let mut catalog = Catalog::new();

    for profile in load_life_products(dir)? {
        catalog.register_life(profile).map_err(|e| StoreError::Parse {
            file: LIFE_FILE.to_string(),
            message: e.to_string(),
        })?;
    }
    for profile in load_property_products(dir)? {
        catalog.register_property(profile).map_err(|e| StoreError::Parse {
            file: PROPERTY_FILE.to_string(),
            message: e.to_string(),
        })?;
    }
    for profile in load_pension_products(dir)? {
        catalog.register_pension(profile).map_err(|e| StoreError::Parse {
            file: PENSION_FILE.to_string(),
            message: e.to_string(),
        })?;
    }
    catalog.set_schedule(load_schedule(dir)?);

    log::info!(
        "Loaded catalog from {}: {} life, {} property, {} pension products, {} contribution tiers",
        dir.display(),
        catalog.life_products().len(),
        catalog.property_products().len(),
        catalog.pension_products().len(),
        catalog.schedule().map(|s| s.len()).unwrap_or(0),
    );

    Ok(catalog)
}

/// Load a full catalog from the default path
pub fn load_default_catalog() -> Result<Catalog, StoreError> {
    load_catalog(Path::new(DEFAULT_PRODUCTS_PATH))
}

/// Directory-backed store that re-reads its CSV files on every fetch
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ProfileStore for CsvStore {
    fn life_profile(&self, product_id: &str) -> Result<Option<LifeInsuranceProfile>, StoreError> {
        Ok(load_life_products(&self.dir)?
            .into_iter()
            .find(|p| p.product_id == product_id))
    }

    fn property_profile(&self, product_id: &str) -> Result<Option<PropertyInsuranceProfile>, StoreError> {
        Ok(load_property_products(&self.dir)?
            .into_iter()
            .find(|p| p.product_id == product_id))
    }

    fn pension_profile(&self, product_id: &str) -> Result<Option<PensionProfile>, StoreError> {
        Ok(load_pension_products(&self.dir)?
            .into_iter()
            .find(|p| p.product_id == product_id))
    }

    fn contribution_schedule(&self) -> Result<Option<TierSchedule>, StoreError> {
        match File::open(self.dir.join(SCHEDULE_FILE)) {
            Ok(file) => Ok(Some(load_schedule_from_reader(file)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
