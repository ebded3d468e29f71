use ace_core::models::{ApiDefinition, Endpoint, Field, FieldType, HttpMethod, Schema};
use ace_core::ComplianceChecker;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const RESOURCES: usize = 40;

fn resource_schema(index: usize, with_email: bool) -> Schema {
    let mut fields = vec![
        Field::new("id", FieldType::Integer).required(true),
        Field::new("name", FieldType::String).required(true),
    ];
    if with_email {
        fields.push(Field::new("email", FieldType::String).required(true));
    }
    Schema::new(format!("Resource{}", index), "", fields)
}

/// 40 resources with 5 operations each
fn build_definition(spec_side: bool) -> ApiDefinition {
    let mut definition = ApiDefinition::new("Bench API", "1.0.0");
    for index in 0..RESOURCES {
        let collection = format!("/resources{}", index);
        let item = if spec_side {
            format!("{}/{{id}}", collection)
        } else {
            format!("{}/{{resource_id}}", collection)
        };
        let schema = format!("Resource{}", index);

        definition
            .add_schema(resource_schema(index, spec_side))
            .expect("unique schema names");
        definition.add_endpoint(Endpoint::new(HttpMethod::Get, collection.clone()));
        definition.add_endpoint(
            Endpoint::new(HttpMethod::Post, collection)
                .with_request_schema(schema.clone())
                .with_response_schema(schema.clone()),
        );
        definition.add_endpoint(
            Endpoint::new(HttpMethod::Get, item.clone()).with_response_schema(schema.clone()),
        );
        definition.add_endpoint(Endpoint::new(HttpMethod::Put, item.clone()).with_request_schema(schema));
        if spec_side || index % 2 == 0 {
            definition.add_endpoint(Endpoint::new(HttpMethod::Delete, item));
        }
    }
    definition
}

fn bench_full_check(c: &mut Criterion) {
    let spec = build_definition(true);
    let implementation = build_definition(false);

    c.bench_function("check_200_endpoints", |b| {
        b.iter(|| {
            let report = ComplianceChecker::new(black_box(&spec), black_box(&implementation))
                .check()
                .expect("spec schemas resolve");
            black_box(report);
        });
    });
}

criterion_group!(benches, bench_full_check);
criterion_main!(benches);
