// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the preview path: embedding decrypted page images
// as data URIs and building the results model for a multi-page scan.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use certscan_core::types::{ImageFileFormat, MedicalCertificateData, Page, ScanSessionId};
use certscan_flow::{ResultsModel, embed_data_uri};

/// A 1024px JPEG preview is typically 150-300 KB; base64 adds a third.
fn bench_embed_data_uri(c: &mut Criterion) {
    let payload = "A".repeat(400 * 1024);

    c.bench_function("embed_data_uri (400 KB)", |b| {
        b.iter(|| black_box(embed_data_uri(ImageFileFormat::Jpg, black_box(&payload))));
    });
}

fn bench_results_model(c: &mut Criterion) {
    let pages = (0..50)
        .map(|i| Page {
            page_id: format!("page-{i}"),
            document_preview_image_file_uri: Some(format!("/data/pages/{i}.jpg")),
            document_image_file_uri: None,
            original_image_file_uri: None,
        })
        .collect();
    let payload = MedicalCertificateData {
        pages,
        ..Default::default()
    };
    let session = ScanSessionId::new();

    c.bench_function("results_model (50 pages)", |b| {
        b.iter(|| black_box(ResultsModel::from_payload(session, black_box(payload.clone()))));
    });
}

criterion_group!(benches, bench_embed_data_uri, bench_results_model);
criterion_main!(benches);
