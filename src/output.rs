//! Collection result types and JSON serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::RankedSection;

/// Run metadata attached to every collection result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Documents named by the collection descriptor
    pub input_documents: Vec<String>,
    /// Persona role text
    pub persona: String,
    /// Job-to-be-done text
    pub job_to_be_done: String,
    /// UTC timestamp of the run
    pub processing_timestamp: DateTime<Utc>,
    /// Documents that failed to process, with the failure reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_documents: Vec<FailedDocument>,
}

/// A per-document failure recorded in the result instead of aborting the
/// collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDocument {
    /// Document filename
    pub document: String,
    /// Failure description
    pub reason: String,
}

/// One ranked section in the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSection {
    /// Source document filename
    pub document: String,
    /// Section heading text
    pub section_title: String,
    /// 1-based importance rank
    pub importance_rank: usize,
    /// Page the section starts on
    pub page_number: u32,
}

/// One refined subsection in the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    /// Source document filename
    pub document: String,
    /// Extractive summary of the section
    pub refined_text: String,
    /// Page the section starts on
    pub page_number: u32,
}

/// The complete result for one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResult {
    /// Run metadata
    pub metadata: RunMetadata,
    /// Ranked sections, ordered by importance rank
    pub extracted_sections: Vec<ExtractedSection>,
    /// Refined texts for the top sections, ordered by importance rank
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl CollectionResult {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ExtractedSection {
    /// Build a result row from a ranked section.
    pub fn from_ranked(ranked: &RankedSection) -> Self {
        Self {
            document: ranked.section.document.clone(),
            section_title: ranked.section.display_title().to_string(),
            importance_rank: ranked.rank,
            page_number: ranked.section.page,
        }
    }
}
