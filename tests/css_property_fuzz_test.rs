use domglue::Host;
use proptest::prelude::*;

fn declaration_strategy() -> BoxedStrategy<(&'static str, &'static str)> {
    prop_oneof![
        Just(("color", "red")),
        Just(("font-size", "1em")),
        Just(("display", "block")),
        Just(("margin-top", "4px")),
        Just(("line-height", "1.5")),
        Just(("opacity", "0.4")),
    ]
    .boxed()
}

fn pad_strategy() -> BoxedStrategy<&'static str> {
    prop_oneof![
        Just(""),
        Just(" "),
        Just("  "),
        Just("\n"),
        Just("\n   "),
        Just("\t"),
    ]
    .boxed()
}

proptest! {
    // The same declarations must land identically no matter how the rule
    // string is padded, wrapped, or terminated.
    #[test]
    fn css_application_is_format_invariant(
        decls in proptest::collection::vec(declaration_strategy(), 1..5),
        pads in proptest::collection::vec(pad_strategy(), 12),
        trailing_semicolon in any::<bool>(),
    ) {
        let canonical: String = decls
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut noisy = String::new();
        let mut pad = pads.iter().cycle();
        for (idx, (property, value)) in decls.iter().enumerate() {
            noisy.push_str(pad.next().unwrap());
            noisy.push_str(property);
            noisy.push(':');
            noisy.push_str(pad.next().unwrap());
            noisy.push_str(value);
            if idx + 1 < decls.len() || trailing_semicolon {
                noisy.push(';');
            }
            noisy.push_str(pad.next().unwrap());
        }

        let clean_host = Host::from_html("<div id='x'></div>").unwrap();
        let noisy_host = Host::from_html("<div id='x'></div>").unwrap();
        let clean = clean_host.select("#x").unwrap();
        let dirty = noisy_host.select("#x").unwrap();

        clean.css(&canonical);
        dirty.css(&noisy);

        for (property, _) in &decls {
            prop_assert_eq!(clean.style(property), dirty.style(property));
        }
    }

    // Selector text of any shape must produce a value or an error, never a
    // panic.
    #[test]
    fn selector_parsing_never_panics(input in "[ -~]{0,40}") {
        let host = Host::from_html("<div id='x' class='c'><p data-k='v'>t</p></div>").unwrap();
        let _ = host.get(&input);
        let _ = host.all(&input);
    }

    // Pairing add_class with toggle_class restores the original class set
    // for any name not already present.
    #[test]
    fn toggle_pair_restores_the_class_set(name in "[a-z][a-z0-9-]{0,8}") {
        let host = Host::from_html("<div id='x' class='base other'></div>").unwrap();
        let x = host.select("#x").unwrap();
        let before = x.class_list();
        prop_assume!(!before.contains(&name));

        x.add_class(&name);
        x.toggle_class(&name);
        prop_assert_eq!(x.class_list(), before);
    }

    // Markup of any shape either parses or reports an error, never a panic.
    #[test]
    fn html_parsing_is_total(input in "[ -~]{0,60}") {
        let _ = Host::from_html(&input);
    }

    // Generated trees survive a serialize/reparse/serialize round trip.
    #[test]
    fn serialization_round_trips(tree in tree_strategy()) {
        let markup = render(&tree);
        let host = Host::from_html(&markup).unwrap();
        let dumped = host.dump();
        let reparsed = Host::from_html(&dumped).unwrap();
        prop_assert_eq!(reparsed.dump(), dumped);
    }
}

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Element {
        tag: &'static str,
        marker: String,
        children: Vec<Piece>,
    },
}

fn tree_strategy() -> BoxedStrategy<Piece> {
    let leaf = "[a-z ]{1,12}".prop_map(Piece::Text).boxed();
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop_oneof![
                Just("div"),
                Just("span"),
                Just("p"),
                Just("section"),
                Just("em"),
            ],
            "[a-z0-9]{0,6}",
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, marker, children)| Piece::Element {
                tag,
                marker,
                children,
            })
            .boxed()
    })
    .boxed()
}

fn render(piece: &Piece) -> String {
    match piece {
        Piece::Text(text) => text.clone(),
        Piece::Element {
            tag,
            marker,
            children,
        } => {
            let inner: String = children.iter().map(render).collect();
            if marker.is_empty() {
                format!("<{tag}>{inner}</{tag}>")
            } else {
                format!("<{tag} data-m=\"{marker}\">{inner}</{tag}>")
            }
        }
    }
}
