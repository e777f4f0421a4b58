mod common;

use common::Fixture;
use yanote_core::{slugify, NoteForm, NoteServiceError, RepoError, WARNING};

fn new_note_form() -> NoteForm {
    NoteForm::new("Новая заметка", "Текст новой заметки", "novaya-zametka")
}

#[test]
fn author_creates_note_with_submitted_fields() {
    let fx = Fixture::new();
    fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let created = service.create_note(fx.author.id, &new_note_form()).unwrap();

    assert_eq!(service.count_notes().unwrap(), 2);
    let stored = service.get_note(fx.author.id, "novaya-zametka").unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.title, "Новая заметка");
    assert_eq!(stored.text, "Текст новой заметки");
    assert_eq!(stored.author, fx.author.id);
}

#[test]
fn blank_slug_is_slugified_title() {
    let fx = Fixture::new();
    let service = fx.notes();

    let form = NoteForm::new("Новая заметка", "Текст новой заметки", "");
    let created = service.create_note(fx.author.id, &form).unwrap();

    assert_eq!(created.slug, slugify("Новая заметка"));
}

#[test]
fn duplicate_slug_is_a_slug_field_error() {
    let fx = Fixture::new();
    let existing = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let form = NoteForm::new("Новая заметка", "Текст", existing.slug.clone());
    let err = service.create_note(fx.author.id, &form).unwrap_err();

    match err {
        NoteServiceError::Invalid(errors) => {
            assert_eq!(errors.field("slug"), [format!("{}{WARNING}", existing.slug)]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.count_notes().unwrap(), 1);
}

#[test]
fn slug_uniqueness_spans_authors() {
    let fx = Fixture::new();
    let existing = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let form = NoteForm::new("Другая", "Текст", existing.slug.clone());
    let err = service.create_note(fx.not_author.id, &form).unwrap_err();
    assert!(matches!(err, NoteServiceError::Invalid(_)));
}

#[test]
fn list_contains_only_own_notes() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    assert_eq!(service.list_notes(fx.author.id).unwrap(), vec![note.clone()]);
    assert!(service.list_notes(fx.not_author.id).unwrap().is_empty());
    assert!(service.list_notes(fx.admin.id).unwrap().is_empty());
}

#[test]
fn foreign_note_is_not_found_for_every_other_user() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    for user in [&fx.not_author, &fx.admin, &fx.another] {
        assert!(matches!(
            service.get_note(user.id, &note.slug),
            Err(NoteServiceError::NoteNotFound(_))
        ));
        assert!(matches!(
            service.update_note(user.id, &note.slug, &new_note_form()),
            Err(NoteServiceError::NoteNotFound(_))
        ));
        assert!(matches!(
            service.delete_note(user.id, &note.slug),
            Err(NoteServiceError::NoteNotFound(_))
        ));
    }

    assert_eq!(service.get_note(fx.author.id, &note.slug).unwrap(), note);
    assert_eq!(service.count_notes().unwrap(), 1);
}

#[test]
fn missing_and_foreign_notes_are_indistinguishable() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let foreign = service.get_note(fx.not_author.id, &note.slug).unwrap_err();
    let missing = service.get_note(fx.not_author.id, "no-such-note").unwrap_err();
    assert!(matches!(foreign, NoteServiceError::NoteNotFound(_)));
    assert!(matches!(missing, NoteServiceError::NoteNotFound(_)));
}

#[test]
fn author_edits_own_note() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let updated = service
        .update_note(fx.author.id, &note.slug, &new_note_form())
        .unwrap();

    assert_eq!(updated.id, note.id);
    let stored = service.get_note(fx.author.id, "novaya-zametka").unwrap();
    assert_eq!(stored.title, "Новая заметка");
    assert_eq!(stored.text, "Текст новой заметки");
    assert!(service.get_note(fx.author.id, &note.slug).is_err());
}

#[test]
fn edit_may_keep_its_own_slug() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    let service = fx.notes();

    let form = NoteForm::new("Заметка", "Новый текст", note.slug.clone());
    let updated = service.update_note(fx.author.id, &note.slug, &form).unwrap();
    assert_eq!(updated.slug, note.slug);
    assert_eq!(updated.text, "Новый текст");
}

#[test]
fn note_with_untransliterable_title_saves_unchanged() {
    let fx = Fixture::new();
    let note = fx.seed_note("Café", "body");
    assert_eq!(note.slug, "caf");
    let service = fx.notes();

    let resubmitted = NoteForm::new(note.title.clone(), note.text.clone(), note.slug.clone());
    let updated = service
        .update_note(fx.author.id, &note.slug, &resubmitted)
        .unwrap();
    assert_eq!(updated, note);
}

#[test]
fn edit_into_taken_slug_leaves_note_unchanged() {
    let fx = Fixture::new();
    let first = fx.seed_note("Заметка", "Текст заметки");
    let second = fx.seed_note("Вторая", "Текст второй");
    let service = fx.notes();

    let form = NoteForm::new("Вторая", "Изменено", first.slug.clone());
    let err = service
        .update_note(fx.author.id, &second.slug, &form)
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Invalid(_)));

    assert_eq!(service.get_note(fx.author.id, &second.slug).unwrap(), second);
}

#[test]
fn author_deletes_own_note_and_count_drops_by_one() {
    let fx = Fixture::new();
    let note = fx.seed_note("Заметка", "Текст заметки");
    fx.seed_note("Вторая", "Текст второй");
    let service = fx.notes();
    let before = service.count_notes().unwrap();

    let deleted = service.delete_note(fx.author.id, &note.slug).unwrap();

    assert_eq!(deleted, note);
    assert_eq!(service.count_notes().unwrap(), before - 1);
    assert!(service.get_note(fx.author.id, &note.slug).is_err());
}

#[test]
fn invalid_form_reports_fields_and_stores_nothing() {
    let fx = Fixture::new();
    let service = fx.notes();

    let err = service
        .create_note(fx.author.id, &NoteForm::new("", "", ""))
        .unwrap_err();
    match err {
        NoteServiceError::Invalid(errors) => {
            assert!(!errors.field("title").is_empty());
            assert!(!errors.field("text").is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.count_notes().unwrap(), 0);
}

#[test]
fn missing_author_is_a_storage_error_not_a_slug_conflict() {
    let fx = Fixture::new();
    let service = fx.notes();

    let form = NoteForm::new("Заметка", "Текст", "fresh-slug");
    let err = service.create_note(9999, &form).unwrap_err();

    assert!(
        matches!(err, NoteServiceError::Repo(RepoError::Db(_))),
        "unexpected error: {err}"
    );
    assert_eq!(service.count_notes().unwrap(), 0);
}
