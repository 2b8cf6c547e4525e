use explorer_model::{Fragment, ResolvedQuery, ValuesBinding};

const INDENT: &str = "  ";

/// Renders the body of the `WHERE` clause, without the surrounding braces.
///
/// `VALUES` blocks from the options come first, followed by the fragments in order. The main
/// query and the pagination count query both embed this exact text.
pub fn render_where(query: &ResolvedQuery) -> String {
    let mut out = String::new();
    for binding in &query.options.values {
        render_values(binding, 1, &mut out);
    }
    render_all(&query.where_clause, 1, &mut out);
    out
}

fn render_all(fragments: &[Fragment], depth: usize, out: &mut String) {
    for fragment in fragments {
        render_fragment(fragment, depth, out);
    }
}

fn render_fragment(fragment: &Fragment, depth: usize, out: &mut String) {
    if fragment.is_empty() {
        return;
    }
    match fragment {
        Fragment::Raw(pattern) => {
            for line in pattern.lines().map(str::trim).filter(|l| !l.is_empty()) {
                push_line(out, depth, line);
            }
        }
        Fragment::Triple {
            subject,
            predicate,
            object,
        } => push_line(out, depth, &format!("{subject} {predicate} {object} .")),
        Fragment::Optional(fragments) => {
            push_line(out, depth, "OPTIONAL {");
            render_all(fragments, depth + 1, out);
            push_line(out, depth, "}");
        }
        Fragment::Union(branches) => {
            let branches = branches
                .iter()
                .filter(|branch| !branch.iter().all(Fragment::is_empty));
            for (i, branch) in branches.enumerate() {
                if i > 0 {
                    push_line(out, depth, "UNION");
                }
                push_line(out, depth, "{");
                render_all(branch, depth + 1, out);
                push_line(out, depth, "}");
            }
        }
        Fragment::Filter(expression) => {
            push_line(out, depth, &format!("FILTER({})", expression.trim()));
        }
        Fragment::Values(binding) => render_values(binding, depth, out),
        Fragment::Bind {
            expression,
            variable,
        } => push_line(
            out,
            depth,
            &format!("BIND({} AS {variable})", expression.trim()),
        ),
        Fragment::Group(fragments) => render_all(fragments, depth, out),
    }
}

fn render_values(binding: &ValuesBinding, depth: usize, out: &mut String) {
    let values = binding
        .values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let line = if values.is_empty() {
        format!("VALUES {} {{ }}", binding.variable)
    } else {
        format!("VALUES {} {{ {values} }}", binding.variable)
    };
    push_line(out, depth, &line);
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_model::{Node, Proto, QueryDescriptor, QueryParams, Value, Variable};

    fn render(descriptor: &QueryDescriptor) -> String {
        render_where(&descriptor.resolve(&QueryParams::default()))
    }

    #[test]
    fn raw_fragments_are_reindented() {
        let descriptor = QueryDescriptor::new(Proto::new("id"))
            .with_where("  ?id a od:L11_Smell .\n\n      ?id rdfs:label ?label .  ");
        assert_eq!(
            render(&descriptor),
            "  ?id a od:L11_Smell .\n  ?id rdfs:label ?label .\n"
        );
    }

    #[test]
    fn union_branches_are_separated() {
        let descriptor = QueryDescriptor::new(Proto::new("id")).with_where(Fragment::union([
            vec![Fragment::raw("?id od:F3_had_source ?source .")],
            vec![],
            vec![Fragment::raw("?id od:F4_had_carrier ?carrier .")],
        ]));
        assert_eq!(
            render(&descriptor),
            "  {\n    ?id od:F3_had_source ?source .\n  }\n  UNION\n  {\n    ?id od:F4_had_carrier ?carrier .\n  }\n"
        );
    }

    #[test]
    fn structured_fragments() {
        let id = Variable::new_unchecked("id");
        let descriptor = QueryDescriptor::new(Proto::new("id"))
            .with_where(Fragment::triple(
                id.clone(),
                "rdfs:label",
                Node::Value(Value::language_literal("rose", "en")),
            ))
            .with_where(Fragment::optional([Fragment::triple(
                id.clone(),
                "crm:P2_has_type",
                Variable::new_unchecked("type"),
            )]))
            .with_where(Fragment::bind("YEAR(?date)", Variable::new_unchecked("year")))
            .with_where(Fragment::filter(" ?year > 1600 "));
        assert_eq!(
            render(&descriptor),
            "  ?id rdfs:label \"rose\"@en .\n  OPTIONAL {\n    ?id crm:P2_has_type ?type .\n  }\n  BIND(YEAR(?date) AS ?year)\n  FILTER(?year > 1600)\n"
        );
    }

    #[test]
    fn option_values_come_first() {
        let descriptor = QueryDescriptor::new(Proto::new("id"))
            .with_where("?id a ?type .")
            .values(ValuesBinding::new(
                Variable::new_unchecked("type"),
                [Value::prefixed("od:L11_Smell"), Value::literal("x\"y")],
            ));
        assert_eq!(
            render(&descriptor),
            "  VALUES ?type { od:L11_Smell \"x\\\"y\" }\n  ?id a ?type .\n"
        );
    }

    #[test]
    fn empty_values_match_nothing() {
        let descriptor = QueryDescriptor::new(Proto::new("id"))
            .with_where(Fragment::Values(ValuesBinding::new(
                Variable::new_unchecked("id"),
                [],
            )));
        assert_eq!(render(&descriptor), "  VALUES ?id { }\n");
    }

    #[test]
    fn groups_flatten_in_place() {
        let descriptor = QueryDescriptor::new(Proto::new("id")).with_where(Fragment::group([
            Fragment::raw("?id a ?type ."),
            Fragment::group([Fragment::raw("?id rdfs:label ?label .")]),
        ]));
        assert_eq!(
            render(&descriptor),
            "  ?id a ?type .\n  ?id rdfs:label ?label .\n"
        );
    }
}
