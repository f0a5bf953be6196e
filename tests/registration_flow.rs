use crux_core::testing::AppTester;
use docket_shared::capabilities::{CasesError, CreateCaseResponse};
use docket_shared::{
    App, DraftField, Effect, Event, Model, SubmissionState, ToastKind, ViewState,
    ALL_FIELDS_REQUIRED_MESSAGE,
};

fn grant_access(app: &AppTester<App, Effect>, model: &mut Model) {
    let mut update = app.update(Event::AppStarted, model);
    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Auth(request) => Some(request),
            _ => None,
        })
        .expect("auth request");

    let update = app.resolve(request, Ok(true)).expect("resolve access check");
    for event in update.events {
        let _ = app.update(event, model);
    }
    assert!(model.access.is_granted());
}

fn fill_draft(app: &AppTester<App, Effect>, model: &mut Model) {
    for (field, value) in [
        (DraftField::CourtId, "CRT1"),
        (DraftField::Description, "Theft case"),
        (DraftField::CaseType, "Criminal"),
        (DraftField::Petitioner, "State"),
        (DraftField::Respondent, "John Doe"),
        (DraftField::StartDate, "2024-01-01"),
        (DraftField::Status, "Open"),
    ] {
        let _ = app.update(
            Event::FieldChanged {
                field,
                value: value.into(),
            },
            model,
        );
    }
}

fn cases_request_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::Cases(_)))
        .count()
}

#[test]
fn test_successful_submission_resets_the_form() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let mut update = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(cases_request_count(&update.effects), 1);
    assert!(model.submission.is_in_flight());

    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Cases(request) => Some(request),
            _ => None,
        })
        .expect("case-creation request");

    let update = app
        .resolve(
            request,
            Ok(CreateCaseResponse {
                status: true,
                new_case_id: Some("55".into()),
                error: None,
            }),
        )
        .expect("resolve submission");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }

    assert_eq!(model.submission, SubmissionState::Idle);

    let toast = model.active_toast.as_ref().expect("success toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert!(toast.message.contains("55"));

    // Every field is empty again, as one atomic reset.
    match app.view(&model).state {
        ViewState::Ready { form } => {
            assert!(form.court_id.is_empty());
            assert!(form.description.is_empty());
            assert_eq!(form.case_type, None);
            assert!(form.petitioner.is_empty());
            assert!(form.respondent.is_empty());
            assert!(form.start_date.is_empty());
            assert_eq!(form.status, None);
            assert!(form.can_submit);
        }
        other => panic!("expected ready view, got {other:?}"),
    }
}

#[test]
fn test_incomplete_draft_never_reaches_the_collaborator() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);
    let _ = app.update(
        Event::FieldChanged {
            field: DraftField::Respondent,
            value: String::new(),
        },
        &mut model,
    );

    let update = app.update(Event::SubmitRequested, &mut model);

    assert_eq!(cases_request_count(&update.effects), 0);
    assert_eq!(model.submission, SubmissionState::Idle);

    let toast = model.active_toast.as_ref().expect("validation toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, ALL_FIELDS_REQUIRED_MESSAGE);

    // The draft is left as typed, ready to be corrected.
    assert_eq!(model.draft.court_id, "CRT1");
}

#[test]
fn test_resubmit_while_in_flight_is_ignored() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let mut update = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(cases_request_count(&update.effects), 1);

    // Second trigger before the first settles: no second request.
    let reentrant = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(cases_request_count(&reentrant.effects), 0);

    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Cases(request) => Some(request),
            _ => None,
        })
        .expect("case-creation request");

    let update = app
        .resolve(
            request,
            Ok(CreateCaseResponse {
                status: true,
                new_case_id: Some("C-123".into()),
                error: None,
            }),
        )
        .expect("resolve submission");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }

    assert_eq!(model.submission, SubmissionState::Idle);
    assert!(model
        .active_toast
        .as_ref()
        .expect("success toast")
        .message
        .contains("C-123"));
}

#[test]
fn test_application_failure_keeps_the_draft() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let mut update = app.update(Event::SubmitRequested, &mut model);
    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Cases(request) => Some(request),
            _ => None,
        })
        .expect("case-creation request");

    let update = app
        .resolve(
            request,
            Ok(CreateCaseResponse {
                status: false,
                new_case_id: None,
                error: Some("Duplicate court ID".into()),
            }),
        )
        .expect("resolve submission");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }

    assert_eq!(model.submission, SubmissionState::Idle);

    let toast = model.active_toast.as_ref().expect("failure toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("Duplicate court ID"));

    // Values survive so the user can correct and retry without retyping.
    assert_eq!(model.draft.court_id, "CRT1");
    assert_eq!(model.draft.respondent, "John Doe");
    assert!(model.draft.is_complete());
}

#[test]
fn test_transport_failure_keeps_the_draft_and_allows_retry() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let mut update = app.update(Event::SubmitRequested, &mut model);
    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Cases(request) => Some(request),
            _ => None,
        })
        .expect("case-creation request");

    let update = app
        .resolve(
            request,
            Err(CasesError::Network {
                message: "connection refused".into(),
            }),
        )
        .expect("resolve submission");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }

    assert_eq!(model.submission, SubmissionState::Idle);

    let toast = model.active_toast.as_ref().expect("failure toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("connection refused"));
    assert!(model.draft.is_complete());

    // The guard released, so a retry goes straight back out.
    let update = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(cases_request_count(&update.effects), 1);
}

#[test]
fn test_fields_stay_editable_while_in_flight() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(cases_request_count(&update.effects), 1);

    // Only the submit trigger is locked during a submission; typing is not.
    let _ = app.update(
        Event::FieldChanged {
            field: DraftField::Description,
            value: "Theft case, amended".into(),
        },
        &mut model,
    );
    assert_eq!(model.draft.description, "Theft case, amended");

    match app.view(&model).state {
        ViewState::Ready { form } => {
            assert!(form.is_submitting);
            assert!(!form.can_submit);
        }
        other => panic!("expected ready view, got {other:?}"),
    }
}

#[test]
fn test_success_without_case_id_falls_back() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);
    fill_draft(&app, &mut model);

    let mut update = app.update(Event::SubmitRequested, &mut model);
    let request = update
        .effects
        .iter_mut()
        .find_map(|effect| match effect {
            Effect::Cases(request) => Some(request),
            _ => None,
        })
        .expect("case-creation request");

    let update = app
        .resolve(
            request,
            Ok(CreateCaseResponse {
                status: true,
                new_case_id: None,
                error: None,
            }),
        )
        .expect("resolve submission");
    for event in update.events {
        let _ = app.update(event, &mut model);
    }

    let toast = model.active_toast.as_ref().expect("success toast");
    assert!(toast.message.contains("unknown"));
    assert!(!model.draft.is_complete());
}

#[test]
fn test_toast_can_be_dismissed_early() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    grant_access(&app, &mut model);

    let _ = app.update(Event::SubmitRequested, &mut model);
    assert!(model.active_toast.is_some());

    let _ = app.update(Event::ToastDismissed, &mut model);
    assert!(model.active_toast.is_none());
    assert!(app.view(&model).toast.is_none());
}
