use super::*;
use crate::test_support::{document, ids, stats, DocumentFixture};
use shared::domain::Priority;

fn settle(view: &mut QueueViewModel, ticket: &FetchTicket, documents: Vec<Document>) {
    let outcome = view.complete_refresh(ticket, Ok((stats(documents.len() as u64), documents)));
    assert!(matches!(outcome, RefreshOutcome::Applied { .. }));
}

#[test]
fn starts_on_documented_defaults() {
    let view = QueueViewModel::new();
    assert_eq!(view.filters(), FilterState::default());
    assert_eq!(view.stat_filter(), None);
    assert_eq!(view.sort(), SortState::default());
    assert_eq!(view.active_card(), Some(StatFilterKey::Unreviewed));
    assert!(!view.can_clear_filters());
    assert_eq!(
        view.query(),
        DocumentQuery::default().with_status(DocumentStatus::Classified)
    );
}

#[test]
fn refresh_ticket_carries_query_and_page_limit() {
    let mut view = QueueViewModel::new().with_page_limit(50);
    let ticket = view.begin_refresh();
    assert_eq!(ticket.generation, 1);
    assert_eq!(ticket.query.limit, Some(50));
    assert_eq!(ticket.query.status, Some(DocumentStatus::Classified));
    assert!(view.is_loading());
}

#[test]
fn stat_card_resets_dropdowns_to_empty() {
    let mut view = QueueViewModel::new();
    view.set_document_type(Some(DocumentType::LabResult));
    let ticket = view.select_stat_card(StatFilterKey::Reviewed);
    assert_eq!(view.filters(), FilterState::empty());
    assert_eq!(view.stat_filter(), Some(StatFilterKey::Reviewed));
    assert_eq!(
        ticket.query,
        DocumentQuery::default().with_status(DocumentStatus::Reviewed)
    );
}

#[test]
fn activating_a_card_twice_toggles_it_off_to_empty_filters() {
    let mut view = QueueViewModel::new();
    view.select_stat_card(StatFilterKey::Flagged);
    let ticket = view.select_stat_card(StatFilterKey::Flagged);
    assert_eq!(view.stat_filter(), None);
    assert_eq!(view.filters(), FilterState::empty());
    assert!(ticket.query.is_unconstrained());
    assert_eq!(view.active_card(), None);
}

#[test]
fn switching_cards_keeps_the_new_one() {
    let mut view = QueueViewModel::new();
    view.select_stat_card(StatFilterKey::Urgent);
    view.select_stat_card(StatFilterKey::Total);
    assert_eq!(view.stat_filter(), Some(StatFilterKey::Total));
    assert_eq!(view.active_card(), Some(StatFilterKey::Total));
}

#[test]
fn dropdown_change_clears_stat_card() {
    let mut view = QueueViewModel::new();
    view.select_stat_card(StatFilterKey::Urgent);
    let ticket = view.set_status_filter(Some(StatusFilter::Dismissed));
    assert_eq!(view.stat_filter(), None);
    assert_eq!(
        ticket.query,
        DocumentQuery::default().with_status(DocumentStatus::Dismissed)
    );
}

#[test]
fn clear_filters_restores_documented_default() {
    let mut view = QueueViewModel::new();
    view.select_stat_card(StatFilterKey::Total);
    assert!(view.can_clear_filters());
    view.clear_filters();
    assert_eq!(view.filters(), FilterState::default());
    assert_eq!(view.stat_filter(), None);
    assert_eq!(view.active_card(), Some(StatFilterKey::Unreviewed));
}

#[test]
fn filter_changes_clear_selection() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1), document(2)]);

    view.select_document(DocumentId(2));
    assert_eq!(view.selected_id(), Some(DocumentId(2)));
    view.select_stat_card(StatFilterKey::Total);
    assert_eq!(view.selected_id(), None);

    view.select_document(DocumentId(1));
    view.set_document_type(Some(DocumentType::Other));
    assert_eq!(view.selected_id(), None);
}

#[test]
fn selecting_the_selected_row_deselects() {
    let mut view = QueueViewModel::new();
    view.select_document(DocumentId(5));
    view.select_document(DocumentId(5));
    assert_eq!(view.selected_id(), None);
}

#[test]
fn stale_responses_are_ignored() {
    let mut view = QueueViewModel::new();
    let first = view.begin_refresh();
    let second = view.select_stat_card(StatFilterKey::Reviewed);

    let late = view.complete_refresh(&first, Ok((stats(9), vec![document(1)])));
    assert_eq!(late, RefreshOutcome::Stale);
    assert!(view.documents().is_empty());
    assert!(view.is_loading());

    settle(&mut view, &second, vec![document(2)]);
    assert_eq!(ids(view.documents()), vec![2]);
    assert!(!view.is_loading());
}

#[test]
fn failed_refresh_keeps_previous_data() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1)]);

    let retry = view.begin_refresh();
    let outcome = view.complete_refresh(
        &retry,
        Err(ClientError::TransportUnavailable("connection refused".to_string())),
    );
    assert_eq!(outcome, RefreshOutcome::Failed);
    assert_eq!(ids(view.documents()), vec![1]);
    assert_eq!(view.stats().map(|s| s.total_documents), Some(1));
    let error = view.error().expect("error recorded");
    assert!(error.unreachable);
    assert!(error.message.starts_with("Cannot connect to server"));

    let again = view.begin_refresh();
    assert!(view.error().is_none());
    settle(&mut view, &again, vec![document(3)]);
    assert_eq!(ids(view.documents()), vec![3]);
}

#[test]
fn server_message_is_kept_verbatim() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    view.complete_refresh(
        &ticket,
        Err(ClientError::RequestFailed {
            status: 422,
            message: "Invalid status value".to_string(),
        }),
    );
    let error = view.error().expect("error recorded");
    assert_eq!(error.message, "Invalid status value");
    assert!(!error.unreachable);
}

#[test]
fn selection_drops_when_document_leaves_the_list() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1), document(2)]);
    view.select_document(DocumentId(2));
    assert_eq!(view.selected_document().map(|doc| doc.id), Some(DocumentId(2)));

    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1)]);
    assert_eq!(view.selected_id(), None);
}

#[test]
fn visible_documents_follow_sort_state() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    settle(
        &mut view,
        &ticket,
        vec![
            document(1).with_priority(Some(Priority::Low)),
            document(2).with_priority(Some(Priority::Critical)),
            document(3).with_priority(Some(Priority::Medium)),
        ],
    );
    assert_eq!(ids(&view.visible_documents()), vec![2, 3, 1]);
    assert_eq!(ids(view.documents()), vec![1, 2, 3]);

    view.toggle_sort(SortKey::Priority);
    assert_eq!(ids(&view.visible_documents()), vec![1, 3, 2]);

    assert!(!view.click_column(Column::Status));
    assert!(view.click_column(Column::PatientName));
    assert_eq!(view.sort(), SortState::new(SortKey::PatientName, sort::SortOrder::Asc));
}

#[test]
fn sort_change_does_not_refetch_or_touch_selection() {
    let mut view = QueueViewModel::new();
    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1)]);
    view.select_document(DocumentId(1));
    view.toggle_sort(SortKey::Confidence);
    assert_eq!(view.selected_id(), Some(DocumentId(1)));
    assert!(!view.is_loading());
}

#[test]
fn stat_cards_reflect_highlight_and_placeholders() {
    let mut view = QueueViewModel::new();
    let cards = view.stat_cards();
    assert!(cards.iter().all(|card| card.value == stats::PLACEHOLDER));
    assert!(cards[1].active);

    let ticket = view.select_stat_card(StatFilterKey::Flagged);
    settle(&mut view, &ticket, vec![document(1), document(2)]);
    let active: Vec<_> = view
        .stat_cards()
        .into_iter()
        .filter(|card| card.active)
        .map(|card| card.label)
        .collect();
    assert_eq!(active, vec!["Flagged"]);
    assert_eq!(view.stat_cards()[0].value, "2");
}

#[test]
fn document_count_label_pluralises() {
    let mut view = QueueViewModel::new();
    assert_eq!(view.document_count_label(), "0 documents");
    let ticket = view.begin_refresh();
    settle(&mut view, &ticket, vec![document(1)]);
    assert_eq!(view.document_count_label(), "1 document");
}

#[test]
fn action_patches() {
    let view = QueueViewModel::new();
    let review = view.action_patch(DocumentId(1), DocumentAction::Review, "Staff");
    assert_eq!(review.status, Some(DocumentStatus::Reviewed));
    assert_eq!(review.reviewed_by.as_deref(), Some("Staff"));

    let flag = view.action_patch(DocumentId(1), DocumentAction::Flag, "Staff");
    assert_eq!(flag, DocumentPatch::status(DocumentStatus::Flagged));

    let dismiss = DocumentAction::Dismiss.patch("Staff");
    assert_eq!(dismiss, DocumentPatch::status(DocumentStatus::Dismissed));
}

#[test]
fn finishing_an_action_closes_detail_and_refetches_same_query() {
    let mut view = QueueViewModel::new();
    let ticket = view.select_stat_card(StatFilterKey::Urgent);
    settle(&mut view, &ticket, vec![document(1)]);
    view.select_document(DocumentId(1));

    let next = view.finish_action();
    assert_eq!(view.selected_id(), None);
    assert_eq!(next.query, ticket.query);
    assert!(next.generation > ticket.generation);
}
