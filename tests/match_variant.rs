#![cfg(feature = "macros")]

use tunion::{Variant, match_variant};

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct Label(String);

#[derive(Debug, Clone, PartialEq)]
struct Empty;

type Shape = Variant![Point, Label, Empty, u32];

fn area(shape: Shape) -> i64 {
    match_variant!(shape {
        Point { .. } => 0,
        Label(text) => text.len() as i64,
        Empty => -1,
        n @ 0u32 => n.into(),
        n @ 1u32 => i64::from(n) * 10,
        _ => 100,
    })
}

#[test]
fn exhaustive_match() {
    assert_eq!(area(Variant::new(Point { x: 1, y: 2 })), 0);
    assert_eq!(area(Variant::new(Label("abc".to_string()))), 3);
    assert_eq!(area(Variant::new(Empty)), -1);
    assert_eq!(area(Variant::new(0u32)), 0);
    assert_eq!(area(Variant::new(1u32)), 10);
    assert_eq!(area(Variant::new(7u32)), 100);
}

#[test]
fn guards_fall_through() {
    let classify = |shape: Shape| {
        match_variant!(shape {
            p @ Point { .. } if p.x == p.y => "diagonal",
            Point { x: 0, .. } => "vertical",
            Point { .. } => "point",
            Label(_) | Empty => "named",
            _ => "number",
        })
    };

    assert_eq!(classify(Variant::new(Point { x: 3, y: 3 })), "diagonal");
    assert_eq!(classify(Variant::new(Point { x: 0, y: 3 })), "vertical");
    assert_eq!(classify(Variant::new(Point { x: 1, y: 3 })), "point");
    assert_eq!(classify(Variant::new(Label(String::new()))), "named");
    assert_eq!(classify(Variant::new(Empty)), "named");
    assert_eq!(classify(Variant::new(9u32)), "number");
}

#[test]
fn moves_the_alternative_out() {
    let shape: Shape = Variant::new(Label("owned".to_string()));
    let text = match_variant!(shape {
        Label(text) => Some(text),
        _ => None,
    });
    assert_eq!(text.as_deref(), Some("owned"));
}

#[test]
fn full_range_is_a_wildcard() {
    let is_empty = |shape: Shape| {
        match_variant!(shape {
            Empty => true,
            .. => false,
        })
    };

    assert!(is_empty(Variant::new(Empty)));
    assert!(!is_empty(Variant::new(3u32)));
}

#[test]
fn early_return_from_an_arm() {
    fn first_coordinate(shape: Shape) -> Option<i32> {
        let x = match_variant!(shape {
            Point { x, .. } => x,
            _ => return None,
        });
        Some(x * 2)
    }

    assert_eq!(first_coordinate(Variant::new(Point { x: 4, y: 0 })), Some(8));
    assert_eq!(first_coordinate(Variant::new(Empty)), None);
}

#[cfg(not(feature = "abort-on-bad-access"))]
#[test]
#[should_panic(expected = "bad variant access")]
fn valueless_is_a_bad_access() {
    let shape: Shape = Variant::valueless();
    area(shape);
}
