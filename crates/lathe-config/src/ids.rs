use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! refactoring_ids {
    ($($variant:ident => $id:literal,)*) => {
        /// Stable identifier of one refactoring, used for opt-out and as the
        /// equivalence key of offered actions.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "kebab-case")]
        pub enum RefactoringId {
            $($variant,)*
        }

        impl RefactoringId {
            pub const ALL: &'static [RefactoringId] = &[$(RefactoringId::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(RefactoringId::$variant => $id,)*
                }
            }
        }

        impl FromStr for RefactoringId {
            type Err = UnknownRefactoringId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok(RefactoringId::$variant),)*
                    _ => Err(UnknownRefactoringId(s.to_owned())),
                }
            }
        }
    };
}

refactoring_ids! {
    AddBraces => "add-braces",
    RemoveBraces => "remove-braces",
    AddBracesToIfElse => "add-braces-to-if-else",
    RemoveBracesFromIfElse => "remove-braces-from-if-else",
    ConvertDoToWhile => "convert-do-to-while",
    ConvertWhileToDo => "convert-while-to-do",
    ConvertWhileToFor => "convert-while-to-for",
    ConvertForToWhile => "convert-for-to-while",
    ReverseForLoop => "reverse-for-loop",
    MergeIfWithParentIf => "merge-if-with-parent-if",
    SplitIfWithOrCondition => "split-if-with-or-condition",
    SplitIfWithAndCondition => "split-if-with-and-condition",
    InvertIf => "invert-if",
    MergeIfStatements => "merge-if-statements",
    ConvertIfToConditional => "convert-if-to-conditional",
    MergeLocalDeclarations => "merge-local-declarations",
    MergeAssignmentWithReturn => "merge-assignment-with-return",
    WrapInTryCatch => "wrap-in-try-catch",
    WrapInIf => "wrap-in-if",
    SplitVariableDeclaration => "split-variable-declaration",
    JoinStringExpressions => "join-string-expressions",
    ConvertInterpolatedStringToConcatenation => "convert-interpolated-string-to-concatenation",
    ConvertInterpolatedStringToStringLiteral => "convert-interpolated-string-to-string-literal",
    SwapBinaryOperands => "swap-binary-operands",
    InvertConditionalExpression => "invert-conditional-expression",
    ConvertConditionalToIf => "convert-conditional-to-if",
    AddParentheses => "add-parentheses",
    RemoveParentheses => "remove-parentheses",
    InvertBooleanLiteral => "invert-boolean-literal",
    ExpandCompoundAssignment => "expand-compound-assignment",
    UseCompoundAssignment => "use-compound-assignment",
    AddBooleanComparison => "add-boolean-comparison",
    IntroduceLocalVariable => "introduce-local-variable",
    UseExplicitType => "use-explicit-type",
    UseImplicitType => "use-implicit-type",
    AddParameterNullCheck => "add-parameter-null-check",
    RenameAccordingToTypeName => "rename-according-to-type-name",
    ExpandExpressionBody => "expand-expression-body",
    UseExpressionBody => "use-expression-body",
    ExpandProperty => "expand-property",
    ConvertToAutoProperty => "convert-to-auto-property",
    SortMemberDeclarations => "sort-member-declarations",
    SortEnumMembers => "sort-enum-members",
    GenerateEnumValues => "generate-enum-values",
    RemoveMember => "remove-member",
    DuplicateMember => "duplicate-member",
    CommentOutMember => "comment-out-member",
    ChangeAccessibility => "change-accessibility",
    AddBracesToSwitchSection => "add-braces-to-switch-section",
    RemoveBracesFromSwitchSection => "remove-braces-from-switch-section",
    SortCaseLabels => "sort-case-labels",
}

impl fmt::Display for RefactoringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown refactoring id `{0}`")]
pub struct UnknownRefactoringId(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_parse_back() {
        let mut seen = std::collections::BTreeSet::new();
        for id in RefactoringId::ALL {
            assert!(seen.insert(id.as_str()), "duplicate id {id}");
            assert_eq!(id.as_str().parse::<RefactoringId>(), Ok(*id));
        }
        assert!("frobnicate".parse::<RefactoringId>().is_err());
    }

    #[test]
    fn serde_spelling_matches_as_str() {
        for id in RefactoringId::ALL {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }
}
