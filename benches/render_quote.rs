use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use era::core::formatter::to_markdown;
use era::ui::markdown::render_markdown;
use era::ui::theme::Theme;

fn make_reply(paragraphs: usize) -> String {
    let base = "Here are a few ideas + some notes on each one, with **bold** words and a [link](https://ai.google.dev).";
    let mut reply = String::new();
    for i in 0..paragraphs {
        reply.push_str(base);
        reply.push_str("\n\n");
        if i % 3 == 0 {
            reply.push_str("+ first point\n+ second point\n\n");
        }
    }
    reply
}

fn bench_render_quote(c: &mut Criterion) {
    let theme = Theme::dark_default();

    for &paragraphs in &[10usize, 200usize] {
        let reply = make_reply(paragraphs);
        let mut group = c.benchmark_group(format!("render_quote_paragraphs{paragraphs}"));
        group.throughput(Throughput::Bytes(reply.len() as u64));

        group.bench_function(BenchmarkId::new("to_markdown", paragraphs), |b| {
            b.iter(|| to_markdown(&reply))
        });

        let quoted = to_markdown(&reply);
        group.bench_function(BenchmarkId::new("render_markdown", paragraphs), |b| {
            b.iter(|| render_markdown(&quoted, &theme))
        });

        group.finish();
    }
}

criterion_group!(benches, bench_render_quote);
criterion_main!(benches);
