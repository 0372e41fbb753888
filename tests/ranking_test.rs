//! Integration tests for hybrid ranking and subsection refinement.

use sectrank::embed::{Embedder, HashEmbedder};
use sectrank::model::{HeadingLevel, Section};
use sectrank::nlp::StopwordFilter;
use sectrank::rank::{HybridRanker, Query, QueryEncoder, SubsectionSummarizer};
use sectrank::RankConfig;

fn section(document: &str, title: &str, text: &str, page: u32, order: usize) -> Section {
    Section {
        document: document.to_string(),
        title: Some(title.to_string()),
        level: Some(HeadingLevel::H1),
        page,
        blocks: Vec::new(),
        text: text.to_string(),
        order,
    }
}

fn encode(embedder: &dyn Embedder, persona: &str, job: &str) -> Query {
    let stopwords = StopwordFilter::new("en");
    QueryEncoder::new(embedder, &stopwords)
        .encode(persona, job)
        .unwrap()
}

fn rank_sections(
    config: &RankConfig,
    embedder: &dyn Embedder,
    sections: Vec<Section>,
    query: &Query,
) -> Vec<sectrank::model::RankedSection> {
    let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
    let vectors = embedder.embed_batch(&texts).unwrap();
    HybridRanker::new(config).rank(sections, &vectors, query)
}

/// The worked scenario: three sections, one persona, one job. Only
/// "Results" carries the job token and its text sits closest to the job,
/// so it must rank first with finite non-negative scores everywhere.
#[test]
fn test_policy_analyst_scenario() {
    let embedder = HashEmbedder::new();
    let config = RankConfig::default();

    let sections = vec![
        section(
            "study.pdf",
            "Introduction",
            "Introduction\nThis study reviews regional planning documents and their history.",
            1,
            0,
        ),
        section(
            "study.pdf",
            "Methodology",
            "Methodology\nSurvey design, sampling windows and gauge calibration are described.",
            3,
            1,
        ),
        section(
            "study.pdf",
            "Results",
            "Results\nMitigation strategies reduced flood losses; levee mitigation worked best.",
            5,
            2,
        ),
    ];
    let query = encode(&embedder, "Policy analyst", "identify mitigation strategies");

    let ranked = rank_sections(&config, &embedder, sections, &query);

    assert_eq!(ranked[0].section.title.as_deref(), Some("Results"));
    for entry in &ranked {
        assert!(entry.hybrid_score.is_finite());
        assert!(entry.hybrid_score >= 0.0);
        assert!(entry.semantic_score >= 0.0 && entry.lexical_score >= 0.0);
    }
    // Ranks are a 1-based total order.
    let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_identical_inputs_identical_ranking() {
    let embedder = HashEmbedder::new();
    let config = RankConfig::default();
    let make = || {
        vec![
            section("a.pdf", "One", "flood defence spending", 1, 0),
            section("a.pdf", "Two", "annual rainfall tables", 2, 1),
            section("b.pdf", "Three", "defence of coastal towns", 1, 2),
        ]
    };
    let query = encode(&embedder, "Planner", "compare defence options");

    let first = rank_sections(&config, &embedder, make(), &query);
    let second = rank_sections(&config, &embedder, make(), &query);

    let a: Vec<(usize, String)> = first
        .iter()
        .map(|r| (r.rank, r.section.display_title().to_string()))
        .collect();
    let b: Vec<(usize, String)> = second
        .iter()
        .map(|r| (r.rank, r.section.display_title().to_string()))
        .collect();
    assert_eq!(a, b);
}

#[test]
fn test_equal_scores_resolve_by_document_order() {
    let embedder = HashEmbedder::new();
    let config = RankConfig::default();
    let sections = vec![
        section("a.pdf", "Early", "identical content", 1, 0),
        section("a.pdf", "Late", "identical content", 7, 1),
    ];
    let query = encode(&embedder, "Reader", "anything else");

    let ranked = rank_sections(&config, &embedder, sections, &query);
    assert_eq!(ranked[0].section.title.as_deref(), Some("Early"));
    assert_eq!(ranked[1].section.title.as_deref(), Some("Late"));
}

#[test]
fn test_hybrid_monotone_in_lexical_score() {
    // With α < 1 and both axes already normalized, raising the lexical
    // axis at fixed semantic never lowers the fusion.
    let config = RankConfig::new().with_semantic_weight(0.7);
    let alpha = config.semantic_weight;
    let semantic = 0.35;

    let mut previous = f32::MIN;
    for step in 0..=10 {
        let lexical = step as f32 / 10.0;
        let hybrid = alpha * semantic + (1.0 - alpha) * lexical;
        assert!(hybrid >= previous);
        previous = hybrid;
    }
}

#[test]
fn test_empty_query_is_document_order_not_error() {
    let embedder = HashEmbedder::new();
    let config = RankConfig::default();
    let sections = vec![
        section("a.pdf", "First", "some text", 1, 0),
        section("a.pdf", "Second", "other text", 2, 1),
    ];
    let query = encode(&embedder, "", "");
    assert!(query.is_empty());

    let ranked = rank_sections(&config, &embedder, sections, &query);
    assert_eq!(ranked[0].section.title.as_deref(), Some("First"));
    assert!(ranked.iter().all(|r| r.hybrid_score == 0.0));
}

#[test]
fn test_summarizer_totality_over_ranked_sections() {
    let embedder = HashEmbedder::new();
    let config = RankConfig::default();
    let summarizer = SubsectionSummarizer::new(&config, &embedder);
    let query = encode(&embedder, "Policy analyst", "identify mitigation strategies");

    let texts = [
        "One short sentence only.",
        "Mitigation worked. Unrelated aside about catering. Mitigation was funded again.",
        "A first thought. A second thought. A third thought. A fourth thought.",
    ];
    for text in texts {
        let refined = summarizer.refine(text, &query).unwrap();
        let refined = refined.expect("sections with sentences refine to text");
        assert!(!refined.trim().is_empty());
    }
}

#[test]
fn test_refinement_prefers_query_bearing_sentences() {
    let embedder = HashEmbedder::new();
    let mut config = RankConfig::default();
    config.max_summary_sentences = 2;
    let summarizer = SubsectionSummarizer::new(&config, &embedder);
    let query = encode(&embedder, "Policy analyst", "identify mitigation strategies");

    let text = "Mitigation strategies are listed in this section. \
                The venue served sandwiches at noon. \
                Each mitigation strategy was costed separately.";
    let refined = summarizer.refine(text, &query).unwrap().unwrap();

    assert!(refined.contains("mitigation") || refined.contains("Mitigation"));
    assert!(!refined.contains("sandwiches"));
}
