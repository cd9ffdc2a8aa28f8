pub mod health;
pub mod lab_results;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use lab_results::{
    get_biological_age, get_biomarker, get_biomarker_in_category, get_lab_results,
    get_recommendations, upload_lab_results,
};
