use criterion::{black_box, criterion_group, criterion_main, Criterion};

use checkmatelib::url::{canonical_split, clean_url, Domain, MAX_URL_LENGTH};

fn bench_canonical_split(c: &mut Criterion) {
    let long_path = format!("http://example.com/{}", "a".repeat(5000));
    let urls = [
        "http://example.com/",
        "HTTP://User:Pw@Example.COM:80/a//b?x=1#frag",
        "https://bücher.de/katalog?seite=2",
        "http://[2001:4860:4860::8888]:8080/dns",
        long_path.as_str(),
    ];

    c.bench_function("canonical_split", |b| {
        b.iter(|| {
            for url in &urls {
                let _ = black_box(canonical_split(black_box(url), MAX_URL_LENGTH));
            }
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let hosts = [
        "example.com",
        "deep.sub.domain.example.org",
        "127.0.0.1",
        "169.254.169.254",
        "[2607:f8b0:4004:800::200e]",
        "metadata.google.internal",
    ];

    c.bench_function("classify", |b| {
        b.iter(|| {
            for host in &hosts {
                let _ = black_box(Domain::classify(black_box(host)));
            }
        })
    });
}

fn bench_clean_url(c: &mut Criterion) {
    // A mix of accepted and rejected inputs, the way real traffic looks
    let urls = [
        "http://example.com/articles/2024/01/some-story?utm_source=x",
        "HTTP://Example.COM:80/a//b?x=1#frag",
        "http://169.254.169.254/latest/meta-data",
        "http://localhost:8080/admin",
        "ftp://example.com/file",
    ];

    c.bench_function("clean_url", |b| {
        b.iter(|| {
            for url in &urls {
                let _ = black_box(clean_url(black_box(url)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_canonical_split,
    bench_classify,
    bench_clean_url
);
criterion_main!(benches);
