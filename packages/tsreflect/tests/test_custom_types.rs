//! Typers, custom serializers and the warning sink

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use tsreflect::{
    Field, Generator, GeneratorOptions, Kind, Reflect, TypeId, TypeUniverse, TypingStrategy,
};

type Warnings = Rc<RefCell<Vec<String>>>;

fn capturing(options: GeneratorOptions) -> (Generator, Warnings) {
    let warnings: Warnings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&warnings);
    let g = Generator::new(options)
        .with_warning_sink(move |message| sink.borrow_mut().push(message.to_string()));
    (g, warnings)
}

/// A date type that serializes itself and knows its TypeScript type
fn date(u: &mut TypeUniverse) -> TypeId {
    let int = u.basic(Kind::Int64);
    let date = u.declare("Date", "app", Kind::Struct(vec![Field::new("Unix", int)]));
    u.set_custom_serializer(date);
    u.set_typer(date, |_: &Generator, _: bool| "Date".to_string());
    date
}

#[test]
fn test_self_describing_type() {
    let (mut g, warnings) = capturing(GeneratorOptions::default());
    let u = g.universe_mut();
    let date = date(u);
    let date_ptr = u.pointer_to(date);
    let s = u.declare(
        "Event",
        "app",
        Kind::Struct(vec![
            Field::new("At", date),
            Field::new("Until", date_ptr),
            Field::new("Since", date_ptr).tag(r#"json:",omitempty""#),
        ]),
    );

    g.add_type(s).unwrap();

    assert!(matches!(g.typing_strategy(date), TypingStrategy::SelfDescribing(_)));
    assert!(matches!(
        g.typing_strategy(date_ptr),
        TypingStrategy::Structural {
            unresolved_serializer: false
        }
    ));
    assert_eq!(
        g.declarations_typescript(),
        r#"interface Event { "At": Date; "Until": (Date | null); "Since"?: Date; }"#
    );
    assert!(warnings.borrow().is_empty());
}

#[test]
fn test_custom_serializer_without_typer_warns() {
    let (mut g, warnings) = capturing(GeneratorOptions::default());
    let u = g.universe_mut();
    let int = u.basic(Kind::Int);
    let raw = u.declare("Raw", "app", Kind::Struct(vec![Field::new("A", int)]));
    u.set_custom_serializer(raw);
    let s = u.declare("Holder", "app", Kind::Struct(vec![Field::new("Raw", raw)]));

    g.add_type(s).unwrap();
    let output = g.declarations_typescript();

    assert_eq!(
        output,
        [
            r#"interface Holder { "Raw": Raw; }"#,
            r#"interface Raw { "A": number; }"#,
        ]
        .join("\n")
    );
    let warnings = warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Raw"));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let (mut g, warnings) = capturing(GeneratorOptions::quiet());
    let u = g.universe_mut();
    let int = u.basic(Kind::Int);
    let raw = u.declare("Raw", "app", Kind::Struct(vec![Field::new("A", int)]));
    u.set_custom_serializer(raw);

    g.add_type(raw).unwrap();

    assert_eq!(g.type_of(raw), "Raw");
    assert!(warnings.borrow().is_empty());
}

#[test]
fn test_registered_typer_resolves_serializer() {
    let (mut g, warnings) = capturing(GeneratorOptions::default());
    let u = g.universe_mut();
    let string = u.basic(Kind::String);
    let uuid = u.declare("UUID", "app", Kind::Array { elem: string, len: 16 });
    u.set_custom_serializer(uuid);
    let s = u.declare("Row", "app", Kind::Struct(vec![Field::new("ID", uuid)]));
    let mut g = g.with_typer_for(uuid, |_, _| "string".to_string());

    g.add_type(s).unwrap();

    assert_eq!(
        g.declarations_typescript(),
        r#"interface Row { "ID": string; }"#
    );
    assert!(warnings.borrow().is_empty());
}

struct Decimal;

impl Reflect for Decimal {
    fn describe(u: &mut TypeUniverse) -> TypeId {
        u.declare_rust::<Self, _>("Decimal", "github.com/shopspring/decimal", |u| {
            let string = u.basic(Kind::String);
            Kind::Struct(vec![Field::new("value", string).private()])
        })
    }
}

struct Invoice {
    _total: Decimal,
    _rounding: Decimal,
    _discount: Option<Decimal>,
    _issued: DateTime<Utc>,
}

impl Reflect for Invoice {
    fn describe(u: &mut TypeUniverse) -> TypeId {
        u.declare_rust::<Self, _>("Invoice", "app/billing", |u| {
            Kind::Struct(vec![
                Field::new("Total", Decimal::describe(u)),
                Field::new("Rounding", Decimal::describe(u)).tag(r#"json:",omitempty""#),
                Field::new("Discount", <Option<Decimal>>::describe(u))
                    .tag(r#"json:"discount,omitempty""#),
                Field::new("Issued", <DateTime<Utc>>::describe(u)),
            ])
        })
    }
}

#[test]
fn test_with_typer_for_rust_type() {
    let mut g = Generator::default().with_typer::<Decimal>(|_, optional| {
        let ty = if optional { "string" } else { "string | null" };
        ty.to_string()
    });

    g.add::<Invoice>().unwrap();

    assert_eq!(
        g.declarations_typescript(),
        concat!(
            r#"interface Invoice { "Total": string | null; "Rounding"?: string; "#,
            r#""discount"?: string | null; "Issued": string; }"#
        )
    );
}

#[test]
fn test_builtin_types() {
    let mut g = Generator::default();
    let u = g.universe_mut();
    let builtins = u.builtins();
    let s = u.declare(
        "Blob",
        "app",
        Kind::Struct(vec![
            Field::new("Data", builtins.bytes),
            Field::new("Preview", builtins.bytes).tag(r#"json:",omitempty""#),
            Field::new("Created", builtins.time),
            Field::new("Size", builtins.big_int),
            Field::new("Limit", builtins.big_int).tag(r#"json:",omitempty""#),
        ]),
    );

    g.add_type(s).unwrap();

    assert_eq!(
        g.declarations_typescript(),
        concat!(
            r#"interface Blob { "Data": (string | null); "Preview"?: string; "#,
            r#""Created": string; "Size": (number | null); "Limit"?: number; }"#
        )
    );
}

#[test]
fn test_render_never_registers() {
    let mut g = Generator::default();
    let u = g.universe_mut();
    let int = u.basic(Kind::Int);
    let s = u.declare("Loose", "app", Kind::Struct(vec![Field::new("A", int)]));

    assert_eq!(g.type_of(s), r#"{ "A": number; }"#);
    assert!(!g.registry().is_visited(s));
    assert!(g.declarations().is_empty());
}

#[test]
fn test_unsupported_kinds_render_empty() {
    let mut g = Generator::default();
    let u = g.universe_mut();
    let int = u.basic(Kind::Int);
    let chan = u.chan_of(int);
    let s = u.declare(
        "Odd",
        "app",
        Kind::Struct(vec![Field::new("C", chan), Field::new("A", int)]),
    );

    g.add_type(s).unwrap();

    assert_eq!(
        g.declarations_typescript(),
        r#"interface Odd { "C": ; "A": number; }"#
    );
}

#[test]
fn test_default_sink_logs_through_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();

    let mut g = Generator::default();
    let u = g.universe_mut();
    let int = u.basic(Kind::Int);
    let raw = u.declare("Raw", "app", Kind::Struct(vec![Field::new("A", int)]));
    u.set_custom_serializer(raw);
    let s = u.declare("Holder", "app", Kind::Struct(vec![Field::new("Raw", raw)]));

    g.add_type(s).unwrap();

    assert_eq!(g.declarations().len(), 2);
}
