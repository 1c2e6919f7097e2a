use ya_portal::{
    clock::MonotonicClock,
    forms::{self, CommentForm, FormErrors, LoginForm, NoteForm, SignupForm},
    slug::{self, SLUG_MAX_LENGTH},
    urls::{self, Route},
};

// --- Slugs ---

#[test]
fn test_slugify_transliterates_and_joins_words() {
    assert_eq!(slug::slugify("Заголовок"), "zagolovok");
    assert_eq!(slug::slugify("Кто я?"), "kto-ya");
    assert_eq!(slug::slugify("Щука и ёж"), "schuka-i-yozh");
    assert_eq!(slug::slugify("Съешь же ещё"), "sesh-zhe-eschyo");
}

#[test]
fn test_slugify_ascii_rules() {
    assert_eq!(slug::slugify("Hello & World"), "hello-and-world");
    assert_eq!(slug::slugify("  Many   spaces -- and dashes  "), "-many-spaces-and-dashes-");
    assert_eq!(slug::slugify("-edge-"), "-edge-");
    assert_eq!(slug::slugify("? Question"), "-question");
    assert_eq!(slug::slugify("Tom &amp; Jerry"), "tom-and-jerry");
    assert_eq!(slug::slugify("Rust 2024: edition!"), "rust-2024-edition");
    assert_eq!(slug::slugify("?!."), "");
}

#[test]
fn test_separators_collapse_before_symbols_are_dropped() {
    assert_eq!(slug::derive_slug("Кто я ?"), "kto-ya-");
    assert_eq!(slug::derive_slug("a ! b"), "a--b");
    assert_eq!(slug::derive_slug("? Вопрос"), "-vopros");
    assert_eq!(slug::derive_slug("a — b"), "a---b");
}

#[test]
fn test_derive_slug_truncates() {
    let title = "а".repeat(150);
    let derived = slug::derive_slug(&title);
    assert_eq!(derived.chars().count(), SLUG_MAX_LENGTH);
    assert_eq!(slug::derive_slug("Короткий"), "korotkij");
}

#[test]
fn test_slug_validation() {
    assert!(slug::is_valid_slug("note-slug_2"));
    assert!(!slug::is_valid_slug(""));
    assert!(!slug::is_valid_slug("with space"));
    assert!(!slug::is_valid_slug("заметка"));
}

// --- Comment form ---

#[test]
fn test_comment_form_accepts_clean_text() {
    let form = CommentForm {
        text: "  Хорошая новость  ".to_string(),
    };
    assert_eq!(form.clean().unwrap(), "Хорошая новость");
}

#[test]
fn test_comment_form_rejects_bad_words_in_any_case() {
    for text in ["ты редиска", "Негодяй!", "сущий НЕГОДЯЙСКИЙ поступок"] {
        let errors = CommentForm {
            text: text.to_string(),
        }
        .clean()
        .unwrap_err();
        assert_eq!(errors.field("text"), [forms::BAD_WORDS_WARNING.to_string()]);
    }
}

#[test]
fn test_comment_form_requires_text() {
    let errors = CommentForm::default().clean().unwrap_err();
    assert_eq!(errors.field("text"), [forms::REQUIRED.to_string()]);
}

// --- Note form ---

#[test]
fn test_note_form_keeps_explicit_slug() {
    let draft = NoteForm {
        title: "Заголовок".to_string(),
        text: "Текст".to_string(),
        slug: "my-slug".to_string(),
    }
    .clean()
    .unwrap();
    assert_eq!(draft.slug, "my-slug");
    assert_eq!(draft.title, "Заголовок");
}

#[test]
fn test_note_form_derives_missing_slug() {
    let draft = NoteForm {
        title: "Мой заголовок".to_string(),
        text: "Текст".to_string(),
        slug: String::new(),
    }
    .clean()
    .unwrap();
    assert_eq!(draft.slug, "moj-zagolovok");
}

#[test]
fn test_note_form_length_limits() {
    let errors = NoteForm {
        title: "t".repeat(101),
        text: "Текст".to_string(),
        slug: "s".repeat(101),
    }
    .clean()
    .unwrap_err();
    assert_eq!(errors.field("title").len(), 1);
    assert_eq!(errors.field("slug").len(), 1);
    assert!(errors.field("text").is_empty());
}

#[test]
fn test_slug_taken_error_message() {
    let errors = forms::slug_taken_error("note-slug");
    assert_eq!(
        errors.field("slug"),
        ["note-slug - такой slug уже существует, придумайте уникальное значение!".to_string()]
    );
}

// --- Account forms ---

#[test]
fn test_login_form_requires_both_fields() {
    let errors = LoginForm::default().clean().unwrap_err();
    assert_eq!(errors.field("username"), [forms::REQUIRED.to_string()]);
    assert_eq!(errors.field("password"), [forms::REQUIRED.to_string()]);
}

#[test]
fn test_signup_form_username_charset() {
    let form = |username: &str| SignupForm {
        username: username.to_string(),
        password1: "pw".to_string(),
        password2: "pw".to_string(),
    };

    assert!(form("reader.one+tag@site_x-1").clean().is_ok());
    assert_eq!(
        form("bad name").clean().unwrap_err().field("username"),
        [forms::INVALID_USERNAME.to_string()]
    );
    assert!(form(&"u".repeat(151)).clean().is_err());
}

#[test]
fn test_form_errors_serialize_as_field_map() {
    let mut errors = FormErrors::default();
    errors.add("slug", "taken");
    errors.add("slug", "too long");

    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "slug": ["taken", "too long"] }));
}

// --- Routes ---

#[test]
fn test_route_paths() {
    assert_eq!(Route::NewsDetail(5).path(), "/news/5");
    assert_eq!(Route::NewsEdit(5).path(), "/news/comments/5/edit");
    assert_eq!(Route::NotesEdit("a-b").path(), "/notes/edit/a-b");
    assert_eq!(Route::NotesSuccess.path(), "/notes/done");
    assert_eq!(urls::comments_of(5), "/news/5#comments");
}

#[test]
fn test_login_redirect_encoding() {
    assert_eq!(urls::login_redirect("/notes/add"), "/auth/login?next=/notes/add");
    assert_eq!(
        urls::login_redirect("/news/1?a=b&c"),
        "/auth/login?next=/news/1%3Fa%3Db%26c"
    );
}

#[test]
fn test_safe_next() {
    assert!(urls::is_safe_next("/notes/add"));
    assert!(!urls::is_safe_next("//evil.example"));
    assert!(!urls::is_safe_next("/\\evil.example"));
    assert!(!urls::is_safe_next("https://evil.example"));
    assert!(!urls::is_safe_next(""));
}

// --- Clock ---

#[test]
fn test_monotonic_clock_strictly_increases() {
    let clock = MonotonicClock::new();
    let readings: Vec<_> = (0..1000).map(|_| clock.now()).collect();
    assert!(readings.windows(2).all(|pair| pair[0] < pair[1]));
}
