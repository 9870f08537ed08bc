use super::*;

fn filters(status: Option<StatusFilter>, document_type: Option<DocumentType>) -> FilterState {
    FilterState {
        document_type,
        status,
    }
}

fn status_query(status: DocumentStatus) -> DocumentQuery {
    DocumentQuery::default().with_status(status)
}

fn urgent_query() -> DocumentQuery {
    DocumentQuery::default().with_priorities(&[Priority::High, Priority::Critical])
}

#[test]
fn stat_cards_map_to_their_predicates() {
    let empty = FilterState::empty();
    let cases = [
        (StatFilterKey::Total, DocumentQuery::default()),
        (
            StatFilterKey::Unreviewed,
            status_query(DocumentStatus::Classified),
        ),
        (StatFilterKey::Urgent, urgent_query()),
        (StatFilterKey::Reviewed, status_query(DocumentStatus::Reviewed)),
        (StatFilterKey::Flagged, status_query(DocumentStatus::Flagged)),
    ];
    for (key, expected) in cases {
        assert_eq!(reconcile(&empty, Some(key)), expected, "stat card {key}");
    }
}

#[test]
fn dropdown_statuses_map_to_their_predicates() {
    let cases = [
        (
            Some(StatusFilter::Unreviewed),
            status_query(DocumentStatus::Classified),
        ),
        (
            Some(StatusFilter::New),
            status_query(DocumentStatus::Classified),
        ),
        (Some(StatusFilter::Urgent), urgent_query()),
        (
            Some(StatusFilter::Flagged),
            status_query(DocumentStatus::Flagged),
        ),
        (
            Some(StatusFilter::Reviewed),
            status_query(DocumentStatus::Reviewed),
        ),
        (
            Some(StatusFilter::Dismissed),
            status_query(DocumentStatus::Dismissed),
        ),
        (None, DocumentQuery::default()),
    ];
    for (status, expected) in cases {
        assert_eq!(
            reconcile(&filters(status, None), None),
            expected,
            "dropdown {status:?}"
        );
    }
}

#[test]
fn new_and_unreviewed_share_a_predicate() {
    let query = reconcile(&filters(Some(StatusFilter::New), None), None);
    assert_eq!(
        query.to_query_pairs(),
        vec![("status", "classified".to_string())]
    );
}

#[test]
fn stat_card_overrides_status_dropdown() {
    let state = filters(Some(StatusFilter::Dismissed), None);
    assert_eq!(
        reconcile(&state, Some(StatFilterKey::Reviewed)),
        status_query(DocumentStatus::Reviewed)
    );
    assert_eq!(
        reconcile(&state, Some(StatFilterKey::Total)),
        DocumentQuery::default()
    );
}

#[test]
fn document_type_applies_in_both_modes() {
    let state = filters(Some(StatusFilter::Urgent), Some(DocumentType::LabResult));
    assert_eq!(
        reconcile(&state, None),
        urgent_query().with_document_type(Some(DocumentType::LabResult))
    );
    assert_eq!(
        reconcile(&state, Some(StatFilterKey::Flagged)),
        status_query(DocumentStatus::Flagged).with_document_type(Some(DocumentType::LabResult))
    );
    assert_eq!(
        reconcile(&state, Some(StatFilterKey::Total)).to_query_pairs(),
        vec![("document_type", "lab_result".to_string())]
    );
}

#[test]
fn urgent_query_is_encoded_high_then_critical() {
    let query = reconcile(&FilterState::empty(), Some(StatFilterKey::Urgent));
    assert_eq!(
        query.to_query_pairs(),
        vec![("priority", "high,critical".to_string())]
    );
}

#[test]
fn query_source_resolution() {
    let state = filters(Some(StatusFilter::Flagged), None);
    assert_eq!(
        QuerySource::resolve(&state, None),
        QuerySource::ByDropdown(StatusFilter::Flagged)
    );
    assert_eq!(
        QuerySource::resolve(&state, Some(StatFilterKey::Urgent)),
        QuerySource::ByStat(StatFilterKey::Urgent)
    );
    assert_eq!(
        QuerySource::resolve(&state, Some(StatFilterKey::Total)),
        QuerySource::AllDocuments
    );
    assert_eq!(
        QuerySource::resolve(&FilterState::empty(), None),
        QuerySource::AllDocuments
    );
}

#[test]
fn default_filters_highlight_unreviewed_card() {
    assert_eq!(
        active_card(&FilterState::default(), None),
        Some(StatFilterKey::Unreviewed)
    );
}

#[test]
fn explicit_stat_card_is_always_highlighted() {
    assert_eq!(
        active_card(&FilterState::empty(), Some(StatFilterKey::Flagged)),
        Some(StatFilterKey::Flagged)
    );
}

#[test]
fn no_card_highlighted_for_other_dropdown_states() {
    assert_eq!(active_card(&FilterState::empty(), None), None);
    assert_eq!(
        active_card(&filters(Some(StatusFilter::New), None), None),
        None
    );
    assert_eq!(
        active_card(&filters(Some(StatusFilter::Reviewed), None), None),
        None
    );
    assert_eq!(
        active_card(
            &filters(Some(StatusFilter::Unreviewed), Some(DocumentType::Other)),
            None
        ),
        None
    );
}

#[test]
fn default_detection() {
    assert!(FilterState::default().is_default());
    assert!(!FilterState::empty().is_default());
    assert!(!filters(Some(StatusFilter::Unreviewed), Some(DocumentType::MarketingJunk)).is_default());
}

#[test]
fn parses_cli_names() {
    assert_eq!("urgent".parse::<StatusFilter>(), Ok(StatusFilter::Urgent));
    assert_eq!("total".parse::<StatFilterKey>(), Ok(StatFilterKey::Total));
    assert!("confidence".parse::<StatFilterKey>().is_err());
}
