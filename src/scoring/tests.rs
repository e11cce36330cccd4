use super::*;
use crate::constants::{EMBEDDING_DIM, MIN_SCORE, RESULT_TOPK};

fn candidates(scores: &[f32]) -> Vec<ScoreResult> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &s)| ScoreResult::new(format!("id-{i}"), s))
        .collect()
}

#[test]
fn test_cosine_identical_vectors() {
    let v: Vec<i8> = (0..EMBEDDING_DIM).map(|i| ((i % 200) as i32 - 100) as i8).collect();
    let similarity = cosine_similarity_i8(&v, &v);
    assert!((similarity - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_orthogonal_vectors() {
    let v1 = [10i8, 0, 0, 0];
    let v2 = [0i8, 10, 0, 0];
    assert_eq!(cosine_similarity_i8(&v1, &v2), 0.0);
}

#[test]
fn test_cosine_opposite_vectors() {
    let v1 = [5i8, -3, 7];
    let v2 = [-5i8, 3, -7];
    assert!((cosine_similarity_i8(&v1, &v2) + 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_scaled_vectors() {
    let v1 = [1i8, 2, 3];
    let v2 = [20i8, 40, 60];
    assert!((cosine_similarity_i8(&v1, &v2) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_zero_vector_is_zero_not_nan() {
    let zero = [0i8; EMBEDDING_DIM];
    let other: Vec<i8> = (0..EMBEDDING_DIM).map(|i| (i as i8).wrapping_mul(3)).collect();
    let similarity = cosine_similarity_i8(&zero, &other);
    assert_eq!(similarity, 0.0);
    assert!(similarity.is_finite());
    assert_eq!(cosine_similarity_i8(&zero, &zero), 0.0);
}

#[test]
fn test_cosine_different_lengths() {
    assert_eq!(cosine_similarity_i8(&[1, 2], &[1, 2, 3]), 0.0);
}

#[test]
fn test_cosine_empty_vectors() {
    assert_eq!(cosine_similarity_i8(&[], &[]), 0.0);
}

#[test]
fn test_cosine_extreme_codes_do_not_overflow() {
    let a = [i8::MIN; EMBEDDING_DIM];
    let b = [i8::MIN; EMBEDDING_DIM];
    assert!((cosine_similarity_i8(&a, &b) - 1.0).abs() < 1e-6);

    let c = [i8::MAX; EMBEDDING_DIM];
    assert!((cosine_similarity_i8(&a, &c) + 1.0).abs() < 1e-6);
}

#[test]
fn test_select_empty() {
    let selection = select(Vec::new());
    assert!(selection.results.is_empty());
    assert!(selection.stats.is_none());
    assert!(!selection.fell_back);
    assert!(select_scores(Vec::new()).is_empty());
}

#[test]
fn test_select_equal_scores_threshold_and_cap() {
    let selection = select(candidates(&[0.5; 100]));
    let stats = selection.stats.expect("stats for non-empty input");
    assert_eq!(stats.threshold, 0.5);
    assert_eq!(stats.std, 0.0);
    assert_eq!(selection.results.len(), RESULT_TOPK.min(100));
    assert!(!selection.fell_back);
}

#[test]
fn test_select_equal_scores_keep_original_order() {
    let results = select_scores(candidates(&[0.5; 30]));
    let ids: Vec<&str> = results.iter().map(|r| r.identifier.as_str()).collect();
    let expected: Vec<String> = (0..RESULT_TOPK).map(|i| format!("id-{i}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_select_outlier_excludes_low_cluster() {
    let mut scores = vec![0.1f32; 99];
    scores.push(0.9);
    let selection = select(candidates(&scores));

    let stats = selection.stats.unwrap();
    assert!((stats.p90 - 0.1).abs() < 1e-6);
    assert!(stats.threshold > 0.1);
    assert_eq!(selection.results.len(), 1);
    assert_eq!(selection.results[0].identifier, "id-99");
    assert!(!selection.fell_back);
}

#[test]
fn test_select_falls_back_to_topk_below_floor() {
    let scores: Vec<f32> = (0..50).map(|i| 0.2 - i as f32 * 0.001).collect();
    let selection = select(candidates(&scores));

    assert!(selection.fell_back);
    assert_eq!(selection.results.len(), RESULT_TOPK);
    assert_eq!(selection.results[0].identifier, "id-0");
    for pair in selection.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_select_fallback_with_few_candidates() {
    let selection = select(candidates(&[0.05, 0.2, 0.1]));
    assert!(selection.fell_back);
    let ids: Vec<&str> = selection
        .results
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["id-1", "id-2", "id-0"]);
}

#[test]
fn test_select_single_candidate() {
    let selection = select(candidates(&[0.8]));
    assert_eq!(selection.results.len(), 1);
    assert_eq!(selection.stats.unwrap().threshold, 0.8);

    let low = select(candidates(&[0.1]));
    assert!(low.fell_back);
    assert_eq!(low.results.len(), 1);
}

#[test]
fn test_select_caps_above_threshold_at_topk() {
    let mut scores = vec![0.0f32; 400];
    scores.extend((0..40).map(|i| 0.9 - i as f32 * 0.001));
    let selection = select(candidates(&scores));

    assert!(!selection.fell_back);
    assert_eq!(selection.results.len(), RESULT_TOPK);
    assert!(
        selection
            .results
            .iter()
            .all(|r| r.score >= selection.stats.unwrap().threshold)
    );
    assert_eq!(selection.results[0].identifier, "id-400");
}

#[test]
fn test_threshold_never_below_min_score() {
    let scores: Vec<f32> = (0..10).map(|i| -0.5 + i as f32 * 0.01).collect();
    let stats = SelectionStats::from_scores(&scores).unwrap();
    assert_eq!(stats.threshold, MIN_SCORE);
}

#[test]
fn test_p90_index_uses_floor() {
    // n = 11: floor(0.9 * 10) = 9
    let scores: Vec<f32> = (0..11).map(|i| i as f32 / 10.0).collect();
    let stats = SelectionStats::from_scores(&scores).unwrap();
    assert!((stats.p90 - 0.9).abs() < 1e-6);
}

#[test]
fn test_stats_population_std() {
    let stats = SelectionStats::from_scores(&[0.0, 1.0]).unwrap();
    assert!((stats.mean - 0.5).abs() < 1e-6);
    assert!((stats.std - 0.5).abs() < 1e-6);
}

#[test]
fn test_score_result_display() {
    let r = ScoreResult::new("alpha", 0.123456);
    assert_eq!(r.to_string(), "alpha (0.1235)");
}

#[test]
fn test_score_result_json_shape() {
    let json = serde_json::to_value(ScoreResult::new("x", 0.5)).unwrap();
    assert_eq!(json, serde_json::json!({"identifier": "x", "score": 0.5}));
}
