use boardnet::{render, resolve, Component, ComponentKind, Wire};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A ladder of resistors along the upper block, each rung wired across the
/// trench, every other rung tied back to the rail.
fn ladder(rungs: usize) -> (Vec<Component>, Vec<Wire>, Vec<String>) {
    let mut components = Vec::new();
    let mut wires = Vec::new();
    for i in 0..rungs {
        let col = i % 60;
        components.push(
            Component::new(ComponentKind::Resistor)
                .with_terminals([format!("A{}", col), format!("A{}", col + 1)])
                .with_value("1k"),
        );
        // Reverse order so information has to travel back along the chain.
        wires.insert(0, Wire::new(format!("E{}", col), format!("F{}", col)));
        if i % 2 == 0 {
            wires.push(Wire::new(format!("J{}", col), "U+0"));
        }
    }
    (components, wires, vec!["U-0".to_string()])
}

fn bench_resolve(c: &mut Criterion) {
    let (_, wires, grounds) = ladder(60);
    c.bench_function("resolve_60_rungs", |b| {
        b.iter(|| resolve(black_box(&wires), black_box(&grounds)));
    });
}

fn bench_render(c: &mut Criterion) {
    let (components, wires, grounds) = ladder(60);
    c.bench_function("render_60_rungs", |b| {
        b.iter(|| render(black_box(&components), black_box(&wires), black_box(&grounds)));
    });
}

criterion_group!(benches, bench_resolve, bench_render);
criterion_main!(benches);
