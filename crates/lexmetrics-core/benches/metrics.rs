use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lexmetrics_core::grammar::GrammarChecker;
use lexmetrics_core::lexical::tally;
use lexmetrics_core::segment::SentenceSegmenter;

const PASSAGE: &str = "El Sr. García vive en Madrid desde 1998. Cada mañana camina hasta la \
    estación y compra el periódico. ¿Qué lee? Casi siempre las noticias de deportes, etc. \
    Sus hijos estudian en la universidad... Los fines de semana la familia visita a los abuelos. \
    ¡Qué bonito es el campo en primavera! Los perros es muy grandes. El gato duerme al sol.";

fn bench_segmentation(c: &mut Criterion) {
    let segmenter = SentenceSegmenter::new(&[]);
    let long = PASSAGE.repeat(20);

    let mut group = c.benchmark_group("segment");
    group.bench_function("passage", |b| b.iter(|| segmenter.segment(black_box(PASSAGE))));
    group.bench_function("passage_x20", |b| b.iter(|| segmenter.segment(black_box(&long))));
    group.finish();
}

fn bench_grammar(c: &mut Criterion) {
    let checker = GrammarChecker::default();
    let sentences = SentenceSegmenter::new(&[]).segment(PASSAGE);

    c.bench_function("grammar_check_all", |b| {
        b.iter(|| checker.check_all(black_box(&sentences)))
    });
}

fn bench_tally(c: &mut Criterion) {
    let long = PASSAGE.repeat(20);

    let mut group = c.benchmark_group("tally");
    group.bench_function("passage", |b| b.iter(|| tally(black_box(PASSAGE)).ttr()));
    group.bench_function("passage_x20", |b| b.iter(|| tally(black_box(&long)).ttr()));
    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_grammar, bench_tally);
criterion_main!(benches);
