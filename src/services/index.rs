// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Per-request in-memory full-text index over the fetched corpus.
//!
//! Every request builds a fresh tantivy index in RAM and throws it away when
//! the response is written. Pages, headings and content segments each become
//! one searchable record; only `content` is tokenized, the other fields are
//! stored for retrieval and exact filtering.

use crate::models::corpus::Page;
use crate::models::search::{MatchedRecord, PageRecord, RecordKind};
use anyhow::{Context, Result};
use std::collections::HashMap;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer};
use tantivy::{doc, Index, IndexReader, TantivyDocument, Term};

/// Tokenizer registered for the searchable `content` field.
const CONTENT_TOKENIZER: &str = "page_text";

struct Fields {
    id: Field,
    page_id: Field,
    kind: Field,
    content: Field,
    url: Field,
}

impl Fields {
    fn from_schema(schema: &Schema) -> Result<Self> {
        Ok(Self {
            id: schema.get_field("id")?,
            page_id: schema.get_field("page_id")?,
            kind: schema.get_field("type")?,
            content: schema.get_field("content")?,
            url: schema.get_field("url")?,
        })
    }
}

fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    schema_builder.add_text_field("id", STRING | STORED);
    schema_builder.add_text_field("page_id", STRING | STORED);
    schema_builder.add_text_field("type", STRING | STORED);
    let content_indexing = TextFieldIndexing::default()
        .set_tokenizer(CONTENT_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let content_options = TextOptions::default()
        .set_indexing_options(content_indexing)
        .set_stored();
    schema_builder.add_text_field("content", content_options);
    schema_builder.add_text_field("url", STRING | STORED);
    schema_builder.build()
}

fn register_tokenizer(index: &Index) {
    let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(CONTENT_TOKENIZER, tokenizer);
}

/// Searchable view of one fetched corpus.
///
/// Holds the tantivy index for tokenized lookup plus a page-summary map for
/// exact-id retrieval during grouping.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    pages: HashMap<String, PageRecord>,
}

impl SearchIndex {
    /// Build a fresh index over the fetched corpus.
    ///
    /// Non-page record ids are synthesized as the page id key followed by a
    /// per-page counter running across headings then content segments.
    pub fn build(pages: &[Page]) -> Result<Self> {
        let schema = build_schema();
        let index = Index::create_in_ram(schema.clone());
        register_tokenizer(&index);
        let fields = Fields::from_schema(&schema)?;

        let mut page_map = HashMap::new();
        let mut writer = index
            .writer(50_000_000)
            .context("failed to create index writer")?;

        for page in pages {
            let page_key = page.id.to_string();
            writer.add_document(doc!(
                fields.id => page_key.clone(),
                fields.page_id => page_key.clone(),
                fields.kind => RecordKind::Page.as_str().to_string(),
                fields.content => page.title.clone(),
                fields.url => page.url.clone(),
            ))?;

            let mut sequence = 0usize;
            for heading in &page.structured_data.headings {
                writer.add_document(doc!(
                    fields.id => format!("{}{}", page_key, sequence),
                    fields.page_id => page_key.clone(),
                    fields.kind => RecordKind::Heading.as_str().to_string(),
                    fields.content => heading.content.clone(),
                    fields.url => format!("{}#{}", page.url, heading.id),
                ))?;
                sequence += 1;
            }

            for section in &page.structured_data.contents {
                let url = match &section.heading {
                    Some(heading_id) => format!("{}#{}", page.url, heading_id),
                    None => page.url.clone(),
                };
                writer.add_document(doc!(
                    fields.id => format!("{}{}", page_key, sequence),
                    fields.page_id => page_key.clone(),
                    fields.kind => RecordKind::Text.as_str().to_string(),
                    fields.content => section.content.clone(),
                    fields.url => url,
                ))?;
                sequence += 1;
            }

            page_map.insert(
                page_key,
                PageRecord {
                    id: page.id.clone(),
                    content: page.title.clone(),
                    url: page.url.clone(),
                },
            );
        }

        writer.commit().context("failed to commit corpus records")?;
        let reader = index.reader().context("failed to open index reader")?;

        Ok(Self {
            index,
            reader,
            fields,
            pages: page_map,
        })
    }

    /// Run a tokenized prefix search over `content`, optionally restricted to
    /// records whose `type` equals `tag`. Returns up to `limit` hits in rank
    /// order, enriched with their stored fields.
    ///
    /// Every query token must match some indexed token by prefix. The tag
    /// string is passed through to the filter unvalidated; an unknown tag
    /// simply matches nothing.
    pub fn search(&self, query: &str, tag: Option<&str>, limit: usize) -> Result<Vec<MatchedRecord>> {
        let tokens = self.query_tokens(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(tokens.len() + 1);
        for token in &tokens {
            let term = Term::from_field_text(self.fields.content, token);
            clauses.push((
                Occur::Must,
                Box::new(FuzzyTermQuery::new_prefix(term, 0, true)),
            ));
        }
        if let Some(tag) = tag {
            let term = Term::from_field_text(self.fields.kind, tag);
            clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
            ));
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&BooleanQuery::new(clauses), &TopDocs::with_limit(limit))?;

        let mut matches = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(record) = self.read_record(&doc) {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    /// Exact-id retrieval of a page summary record.
    pub fn page(&self, page_key: &str) -> Option<&PageRecord> {
        self.pages.get(page_key)
    }

    fn read_record(&self, doc: &TantivyDocument) -> Option<MatchedRecord> {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };
        Some(MatchedRecord {
            id: text(self.fields.id)?,
            page_id: text(self.fields.page_id)?,
            kind: RecordKind::parse(&text(self.fields.kind)?)?,
            content: text(self.fields.content)?,
            url: text(self.fields.url)?,
        })
    }

    /// Tokenize a query string with the same analyzer the `content` field is
    /// indexed with.
    fn query_tokens(&self, query: &str) -> Vec<String> {
        let Some(mut analyzer) = self.index.tokenizers().get(CONTENT_TOKENIZER) else {
            return Vec::new();
        };
        let mut tokens = Vec::new();
        analyzer
            .token_stream(query)
            .process(&mut |token| tokens.push(token.text.clone()));
        tokens
    }
}
