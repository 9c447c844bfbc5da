//! Built-in command tables.
//!
//! Tables are merged in the order code development, text processing,
//! translation. That order decides which token wins when more than one
//! token is a suffix of the prompt.

use super::CommandEntry;

struct Builtin {
    token: &'static str,
    prefix: &'static str,
    description: &'static str,
}

const CODE_DEVELOPMENT: &[Builtin] = &[
    Builtin {
        token: ":code",
        prefix: "为以下需求编写代码：",
        description: "代码编写",
    },
    Builtin {
        token: ":comment",
        prefix: "为以下代码添加详细的注释：",
        description: "代码注释",
    },
    Builtin {
        token: ":debug",
        prefix: "针对以下内容，进行调试分析并提供解决方案：",
        description: "调试分析",
    },
    Builtin {
        token: ":document",
        prefix: "为以下代码编写技术文档：",
        description: "技术文档生成",
    },
    Builtin {
        token: ":refactor",
        prefix: "重构以下代码，提高可读性和性能：",
        description: "代码重构",
    },
    Builtin {
        token: ":review",
        prefix: "为以下代码进行代码审查，指出问题和改进建议：",
        description: "代码审查",
    },
    Builtin {
        token: ":test",
        prefix: "为以下代码编写测试用例：",
        description: "测试用例生成",
    },
];

const TEXT_PROCESSING: &[Builtin] = &[
    Builtin {
        token: ":analyze",
        prefix: "针对以下内容，进行简要分析，指出核心问题和解决方向：",
        description: "分析",
    },
    Builtin {
        token: ":explain",
        prefix: "针对以下内容，使用通俗易懂的语言进行解释：",
        description: "通俗解释",
    },
    Builtin {
        token: ":improve",
        prefix: "优化以下文本的表达，使其更流畅专业：",
        description: "文本润色",
    },
    Builtin {
        token: ":plan",
        prefix: "针对以下内容，制定详细的分步计划：",
        description: "生成分步计划",
    },
    Builtin {
        token: ":summarize",
        prefix: "针对以下内容，进行总结：",
        description: "总结",
    },
];

const TRANSLATION: &[Builtin] = &[
    Builtin {
        token: ":en",
        prefix: "Translate the following into natural English: ",
        description: "翻译为英文",
    },
    Builtin {
        token: ":zh",
        prefix: "将以下内容翻译成中文：",
        description: "翻译为中文",
    },
];

fn entries(table: &[Builtin]) -> impl Iterator<Item = CommandEntry> + '_ {
    table
        .iter()
        .map(|b| CommandEntry::new(b.token, b.prefix, b.description))
}

/// Code writing, review and documentation commands.
pub fn code_development() -> Vec<CommandEntry> {
    entries(CODE_DEVELOPMENT).collect()
}

/// Analysis, explanation and summarisation commands.
pub fn text_processing() -> Vec<CommandEntry> {
    entries(TEXT_PROCESSING).collect()
}

/// Translation commands.
pub fn translation() -> Vec<CommandEntry> {
    entries(TRANSLATION).collect()
}

/// All built-in commands in registry order.
pub fn all() -> Vec<CommandEntry> {
    entries(CODE_DEVELOPMENT)
        .chain(entries(TEXT_PROCESSING))
        .chain(entries(TRANSLATION))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_tokens_unique() {
        let all = all();
        let tokens: HashSet<&str> = all.iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens.len(), all.len());
        assert_eq!(all.len(), 14);
    }

    #[test]
    fn test_builtin_tokens_have_sentinel() {
        assert!(all().iter().all(|e| e.token.starts_with(':')));
    }

    #[test]
    fn test_table_order() {
        let all = all();
        assert_eq!(all.first().map(|e| e.token.as_str()), Some(":code"));
        assert_eq!(all.last().map(|e| e.token.as_str()), Some(":zh"));
        assert_eq!(
            code_development().len() + text_processing().len() + translation().len(),
            all.len()
        );
    }
}
