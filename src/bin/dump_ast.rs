//! Prints the lowered syntax model of a Go file, for debugging the front end.

use anyhow::Context;
use faulty_errorsas::lowering::CompilationUnit;
use faulty_errorsas::syntax::{NodeId, NodeKind, SymbolResolver};
use std::process::ExitCode;

fn print_node(unit: &CompilationUnit, id: NodeId, indent: usize) {
    let tree = unit.tree();
    let node = tree.node(id);
    let indent_str = "  ".repeat(indent);
    let at = node.span.start;

    let label = match &node.kind {
        NodeKind::CallExpression { args, .. } => format!("Call args={}", args.len()),
        NodeKind::SelectorExpression { .. } => "Selector".to_string(),
        NodeKind::Identifier { name, decl } => {
            let mut label = format!("Ident {name:?}");
            if let Some(decl) = decl {
                let decl_at = tree.node(*decl).span.start;
                label.push_str(&format!(" decl=#{} @{}", decl.index(), decl_at));
            }
            if let Some(symbol) = unit.symbols().symbol_of(id) {
                label.push_str(&format!(" -> {}.{}", symbol.package_path, symbol.name));
            }
            label
        }
        NodeKind::AssignmentStatement { define, .. } => {
            format!("Assign{}", if *define { " (define)" } else { "" })
        }
        NodeKind::UnaryExpression { op, .. } => format!("Unary {}", op.as_str()),
        NodeKind::Other { .. } => "Other".to_string(),
    };

    println!("{indent_str}#{} {label} @{at}", id.index());
    for child in node.children() {
        print_node(unit, child, indent + 1);
    }
}

fn run(path: &str) -> anyhow::Result<()> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let unit = CompilationUnit::from_source(&source)
        .with_context(|| format!("failed to lower {path}"))?;

    println!(
        "{} (package {}, {} nodes, {} symbols)",
        path,
        unit.package().unwrap_or("<none>"),
        unit.tree().len(),
        unit.symbols().len()
    );
    println!("================");
    print_node(&unit, unit.tree().root(), 0);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: dump_ast <file.go>");
        return ExitCode::from(2);
    }

    match run(&args[1]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}
