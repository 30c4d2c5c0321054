//! Turns a [`SyntaxDefinition`] into scanner-ready tables

use super::definition::{SyntaxDefinition, TokenDefinition, TokenKind};
use super::error::{SyntaxError, SyntaxResult};
use crate::charset::{domain_max, validate_domain_bits, Char, IntervalSet, SubstTable, Substitution};
use crate::config::runtime::lexer_preferences;
use crate::{log_error, log_info, log_success, log_warning, logging::codes};
use crate::partition::{EquivCode, Partition, END_OF_ENTITY_CODE};
use crate::trie::{Ambiguity, Priority, Recognition, TokenId, Trie, TrieBuilder};
use std::collections::BTreeMap;

/// Partition and automaton compiled from one syntax definition
#[derive(Debug, Clone)]
pub struct CompiledSyntax {
    name: String,
    domain_bits: u32,
    subst: SubstTable,
    partition: Partition,
    trie: Trie,
    ambiguities: Vec<Ambiguity>,
    token_names: BTreeMap<TokenId, String>,
}

impl CompiledSyntax {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn substitution(&self) -> &SubstTable {
        &self.subst
    }

    /// Ties resolved in favour of the earlier registration
    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }

    pub fn token_name(&self, token: TokenId) -> Option<&str> {
        self.token_names.get(&token).map(String::as_str)
    }

    /// Equivalence codes for `text`
    pub fn encode(&self, text: &str) -> SyntaxResult<Vec<EquivCode>> {
        let max = domain_max(self.domain_bits);
        text.chars()
            .map(|c| {
                let code = c as Char;
                if code > max {
                    Err(crate::charset::CharsetError::char_out_of_domain(code, max).into())
                } else {
                    Ok(self.partition.code(code))
                }
            })
            .collect()
    }

    /// Longest token at the start of `text`
    pub fn recognize_str(&self, text: &str) -> SyntaxResult<Recognition> {
        Ok(self.trie.recognize(self.encode(text)?))
    }

    /// Recognition of the end-of-entity transition
    pub fn recognize_end_of_entity(&self) -> Recognition {
        self.trie.recognize([END_OF_ENTITY_CODE])
    }
}

/// Compiler for syntax definitions
#[derive(Debug, Clone)]
pub struct SyntaxCompiler {
    log_ambiguities: bool,
    max_ambiguities_logged: usize,
}

impl Default for SyntaxCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxCompiler {
    /// Compiler following the active lexer preferences
    pub fn new() -> Self {
        Self {
            log_ambiguities: lexer_preferences().log_ambiguities,
            max_ambiguities_logged: crate::logging::config::get_max_ambiguities_logged(),
        }
    }

    pub fn with_ambiguity_logging(mut self, enabled: bool) -> Self {
        self.log_ambiguities = enabled;
        self
    }

    /// Build the partition, then register every token in definition order
    pub fn compile(&self, definition: &SyntaxDefinition) -> SyntaxResult<CompiledSyntax> {
        crate::logging::with_syntax_context(&definition.name, || {
            let result = self.compile_inner(definition);
            if let Err(e) = &result {
                log_error!(e.error_code(), "Syntax compilation failed",
                    "syntax" => definition.name,
                    "error" => e
                );
            }
            result
        })
    }

    fn compile_inner(&self, definition: &SyntaxDefinition) -> SyntaxResult<CompiledSyntax> {
        let bits = validate_domain_bits(definition.domain_bits)?;
        let max_char = domain_max(bits);

        for token in &definition.tokens {
            if let Some(c) = token.literal_chars().find(|&c| c as Char > max_char) {
                return Err(SyntaxError::unencodable_pattern(&token.name, c, bits));
            }
        }

        let mut subsets: Vec<IntervalSet<Char>> = Vec::with_capacity(definition.subsets.len());
        for (index, subset) in definition.subsets.iter().enumerate() {
            if definition.subsets[..index].iter().any(|s| s.name == subset.name) {
                return Err(SyntaxError::duplicate_subset(&subset.name));
            }
            subsets.push(subset.char_set()?);
        }

        let subst = definition.substitution_table();
        subst.check_domain(max_char)?;
        let chars = definition.significant_set()?;
        let partition = Partition::build(bits, &chars, &subsets, &subst)?;

        let mut builder = TrieBuilder::new(partition.n_codes());
        let mut ambiguities = Vec::new();
        let mut token_names = BTreeMap::new();

        for token in &definition.tokens {
            let found = self.register(&mut builder, definition, &partition, &subst, token)?;
            ambiguities.extend(found);
            token_names
                .entry(token.id)
                .or_insert_with(|| token.name.clone());
        }

        if self.log_ambiguities {
            self.report_ambiguities(&ambiguities, &token_names);
        }

        let trie = builder.finish();

        log_success!(codes::success::SYNTAX_COMPILE_COMPLETE, "Syntax compiled",
            "syntax" => definition.name,
            "tokens" => definition.tokens.len(),
            "codes" => partition.n_codes(),
            "nodes" => trie.node_count(),
            "ambiguities" => ambiguities.len()
        );

        Ok(CompiledSyntax {
            name: definition.name.clone(),
            domain_bits: bits,
            subst,
            partition,
            trie,
            ambiguities,
            token_names,
        })
    }

    fn register(
        &self,
        builder: &mut TrieBuilder,
        definition: &SyntaxDefinition,
        partition: &Partition,
        subst: &SubstTable,
        token: &TokenDefinition,
    ) -> SyntaxResult<Vec<Ambiguity>> {
        let encode = |text: &str| -> Vec<EquivCode> {
            text.chars()
                .map(|c| partition.code(subst.substitute(c as Char)))
                .collect()
        };
        let priority = Priority::from(token.priority);

        let registered = match &token.kind {
            TokenKind::Literal { text } => builder.recognize(&encode(text), token.id, priority),
            TokenKind::Closing {
                text,
                closing_subset,
            } => {
                let closing = subset_codes(definition, partition, token, closing_subset)?;
                builder.recognize_closing(&encode(text), closing, token.id, priority)
            }
            TokenKind::BlankRun {
                prefix,
                blank_subset,
                min,
                max,
                suffix,
            } => {
                let blanks = subset_codes(definition, partition, token, blank_subset)?;
                builder.recognize_b(&encode(prefix), *min, *max, blanks, &encode(suffix), token.id)
            }
            TokenKind::EndOfEntity => builder
                .recognize_ee(END_OF_ENTITY_CODE, token.id)
                .map(|()| Vec::new()),
        };

        registered.map_err(|e| SyntaxError::registration(&token.name, e))
    }

    fn report_ambiguities(&self, ambiguities: &[Ambiguity], names: &BTreeMap<TokenId, String>) {
        let name_of = |id: TokenId| names.get(&id).cloned().unwrap_or_else(|| id.to_string());

        for ambiguity in ambiguities.iter().take(self.max_ambiguities_logged) {
            log_warning!(codes::trie::TOKEN_AMBIGUITY, "Ambiguous token patterns",
                "kept" => name_of(ambiguity.existing),
                "dropped" => name_of(ambiguity.incoming)
            );
        }
        if ambiguities.len() > self.max_ambiguities_logged {
            log_info!("Further ambiguities not logged",
                "suppressed" => ambiguities.len() - self.max_ambiguities_logged
            );
        }
    }
}

fn subset_codes<'p>(
    definition: &SyntaxDefinition,
    partition: &'p Partition,
    token: &TokenDefinition,
    name: &str,
) -> SyntaxResult<&'p [EquivCode]> {
    definition
        .subset_index(name)
        .map(|index| partition.set_codes(index))
        .ok_or_else(|| SyntaxError::unknown_subset(&token.name, name))
}

impl SyntaxDefinition {
    /// Compile with a default [`SyntaxCompiler`]
    pub fn compile(&self) -> SyntaxResult<CompiledSyntax> {
        SyntaxCompiler::new().compile(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionError;
    use crate::syntax::definition::CharSpec;
    use crate::trie::TrieError;
    use assert_matches::assert_matches;

    const COMMENT_END: TokenId = 2;

    fn comment_syntax() -> SyntaxDefinition {
        SyntaxDefinition::from_toml_str(
            r#"
name = "comments"
domain_bits = 7
significant_chars = ["aA->!? \t"]
substitutions = [{ from = "A", to = "a" }]

[[subsets]]
name = "dash"
chars = ["-"]

# Blank runs name their blank class through a subset
[[subsets]]
name = "blank"
chars = [" \t"]

[[tokens]]
id = 1
name = "MDO_COM"
kind = "literal"
text = "<!--"

[[tokens]]
id = 2
name = "COM_END"
kind = "blank_run"
prefix = "-"
blank_subset = "blank"
min = 0
max = 2
suffix = "-->"

[[tokens]]
id = 3
name = "EE"
kind = "end_of_entity"
"#,
        )
        .unwrap()
    }

    fn compile(def: &SyntaxDefinition) -> SyntaxResult<CompiledSyntax> {
        SyntaxCompiler::new().with_ambiguity_logging(false).compile(def)
    }

    #[test]
    fn test_comment_tokens() {
        let syntax = compile(&comment_syntax()).unwrap();

        assert_eq!(
            syntax.recognize_str("<!--x").unwrap(),
            Recognition { token: 1, length: 4 }
        );
        assert_eq!(
            syntax.recognize_str("- -->").unwrap(),
            Recognition { token: COMMENT_END, length: 5 }
        );
        assert_eq!(
            syntax.recognize_str("-\t -->").unwrap(),
            Recognition { token: COMMENT_END, length: 6 }
        );
        assert_eq!(
            syntax.recognize_str("--->").unwrap(),
            Recognition { token: COMMENT_END, length: 4 }
        );
        assert!(!syntax.recognize_str("-   -->").unwrap().is_match());
        assert!(!syntax.recognize_str("?").unwrap().is_match());
        assert_eq!(
            syntax.recognize_end_of_entity(),
            Recognition { token: 3, length: 0 }
        );
    }

    #[test]
    fn test_comment_tokens_with_single_dash_subset() {
        let chars: IntervalSet<Char> = "aA->!? \t".chars().map(|c| c as Char).collect();
        let dash = IntervalSet::from_range('-' as Char, '-' as Char);
        let subst = SubstTable::from_pairs([('A' as Char, 'a' as Char), ('a' as Char, 'a' as Char)]);
        let partition = Partition::build(7, &chars, &[dash], &subst).unwrap();
        let code = |c: char| partition.code(c as Char);
        let encode = |text: &str| text.chars().map(|c| code(c)).collect::<Vec<_>>();

        assert_eq!(code('a'), code('A'));
        assert_ne!(code('-'), code('>'));
        assert_eq!(partition.set_codes(0), &[code('-')]);
        assert!(partition.code_in_subset(code('-'), 0));
        assert!(!partition.code_in_subset(code(' '), 0));

        let mut builder = TrieBuilder::new(partition.n_codes());
        builder.recognize(&encode("<!--"), 1, Priority::DELIM).unwrap();
        builder
            .recognize_b(
                &encode("-"),
                0,
                2,
                &[code(' '), code('\t')],
                &encode("-->"),
                COMMENT_END,
            )
            .unwrap();
        let trie = builder.finish();

        assert_eq!(trie.recognize(encode("<!--")), Recognition { token: 1, length: 4 });
        assert_eq!(
            trie.recognize(encode("- -->")),
            Recognition { token: COMMENT_END, length: 5 }
        );
        assert!(!trie.recognize(encode("-   -->")).is_match());
    }

    #[test]
    fn test_partition_classes() {
        let syntax = compile(&comment_syntax()).unwrap();
        let partition = syntax.partition();

        let dash = partition.code('-' as Char);
        assert_eq!(partition.set_codes(0), &[dash]);
        assert!(partition.code_in_subset(dash, 0));
        assert_eq!(partition.code('A' as Char), partition.code('a' as Char));
        assert_ne!(partition.code(' ' as Char), partition.code('\t' as Char));
        assert_eq!(partition.set_codes(1).len(), 2);
        assert_ne!(partition.code('<' as Char), partition.code('!' as Char));
        assert_ne!(partition.code('x' as Char), END_OF_ENTITY_CODE);
        assert_eq!(syntax.trie().n_codes(), partition.n_codes());
    }

    #[test]
    fn test_encode_rejects_out_of_domain_text() {
        let syntax = compile(&comment_syntax()).unwrap();
        assert_eq!(syntax.encode("aA").unwrap().len(), 2);
        assert_matches!(syntax.encode("é"), Err(SyntaxError::Charset(_)));
    }

    #[test]
    fn test_token_names() {
        let syntax = compile(&comment_syntax()).unwrap();
        assert_eq!(syntax.name(), "comments");
        assert_eq!(syntax.token_name(COMMENT_END), Some("COM_END"));
        assert_eq!(syntax.token_name(99), None);
    }

    #[test]
    fn test_case_folded_keyword() {
        let def = SyntaxDefinition::from_toml_str(
            r#"
fold = "upper"

[[tokens]]
id = 5
name = "DOCTYPE"
kind = "literal"
text = "<!DOCTYPE"
"#,
        )
        .unwrap();
        let syntax = compile(&def).unwrap();

        assert_eq!(
            syntax.recognize_str("<!doctype html").unwrap(),
            Recognition { token: 5, length: 9 }
        );
        assert_eq!(
            syntax.recognize_str("<!DocType").unwrap(),
            Recognition { token: 5, length: 9 }
        );
    }

    #[test]
    fn test_closing_token() {
        let def = SyntaxDefinition::from_toml_str(
            r#"
[[subsets]]
name = "name_start"
chars = [{ min = "a", max = "z" }]

[[tokens]]
id = 1
name = "ETAGO"
kind = "closing"
text = "</"
closing_subset = "name_start"

[[tokens]]
id = 2
name = "STAGO"
kind = "literal"
text = "<"
"#,
        )
        .unwrap();
        let syntax = compile(&def).unwrap();

        assert_eq!(
            syntax.recognize_str("</p>").unwrap(),
            Recognition { token: 1, length: 3 }
        );
        assert_eq!(
            syntax.recognize_str("</>").unwrap(),
            Recognition { token: 2, length: 1 }
        );
    }

    #[test]
    fn test_ambiguities_are_collected() {
        let def = SyntaxDefinition::from_toml_str(
            r#"
[[tokens]]
id = 1
name = "FIRST"
kind = "literal"
text = "&#"

[[tokens]]
id = 2
name = "SECOND"
kind = "literal"
text = "&#"
"#,
        )
        .unwrap();
        let syntax = SyntaxCompiler::new()
            .with_ambiguity_logging(true)
            .compile(&def)
            .unwrap();

        assert_eq!(
            syntax.ambiguities(),
            &[Ambiguity {
                existing: 1,
                incoming: 2
            }]
        );
        assert_eq!(syntax.recognize_str("&#").unwrap().token, 1);
    }

    #[test]
    fn test_unknown_subset() {
        let mut def = comment_syntax();
        def.subsets.retain(|s| s.name != "blank");

        assert_matches!(
            compile(&def),
            Err(SyntaxError::UnknownSubset { ref token, ref subset })
                if token == "COM_END" && subset == "blank"
        );
    }

    #[test]
    fn test_duplicate_subset() {
        let mut def = comment_syntax();
        let copy = def.subsets[0].clone();
        def.subsets.push(copy);

        assert_matches!(
            compile(&def),
            Err(SyntaxError::DuplicateSubset { ref name }) if name == "dash"
        );
    }

    #[test]
    fn test_unencodable_pattern() {
        let mut def = comment_syntax();
        def.tokens.push(TokenDefinition {
            id: 9,
            name: "WIDE".to_string(),
            priority: Default::default(),
            kind: TokenKind::Literal {
                text: "\u{2014}".to_string(),
            },
        });

        let err = compile(&def).unwrap_err();
        assert_matches!(err, SyntaxError::UnencodablePattern { bits: 7, .. });
        assert_eq!(err.offending_char(), Some(0x2014));
        assert_eq!(err.error_code(), codes::syntax::UNENCODABLE_PATTERN);
    }

    #[test]
    fn test_invalid_blank_run_names_token() {
        let mut def = comment_syntax();
        if let TokenKind::BlankRun { min, max, .. } = &mut def.tokens[1].kind {
            *min = 3;
            *max = 1;
        }

        assert_matches!(
            compile(&def),
            Err(SyntaxError::Registration {
                ref token,
                source: TrieError::InvalidBlankRun { .. },
            }) if token == "COM_END"
        );
    }

    #[test]
    fn test_invalid_domain_width() {
        let mut def = comment_syntax();
        def.domain_bits = 0;
        assert_matches!(compile(&def), Err(SyntaxError::Charset(_)));
    }

    #[test]
    fn test_subset_outside_domain() {
        let mut def = comment_syntax();
        def.subsets[1]
            .chars
            .push(CharSpec::Chars("\u{3000}".to_string()));

        assert_matches!(
            compile(&def),
            Err(SyntaxError::Partition(PartitionError::SubsetOutOfDomain { index: 1, .. }))
        );
    }

    #[test]
    fn test_compiled_syntax_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledSyntax>();
    }
}
