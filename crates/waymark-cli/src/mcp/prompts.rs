//! Prompt templates for MCP server

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub template: String,
    pub arguments: Vec<PromptTemplateArg>,
}

impl PromptTemplate {
    /// Replaces every `{name}` placeholder with its argument value.
    pub fn render<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> Result<String, String> {
        let mut text = self.template.clone();
        for arg in &self.arguments {
            match lookup(&arg.name) {
                Some(value) => text = text.replace(&format!("{{{}}}", arg.name), value),
                None if arg.required => {
                    return Err(format!("Required argument '{}' is missing", arg.name))
                }
                None => text = text.replace(&format!("{{{}}}", arg.name), ""),
            }
        }
        Ok(text)
    }
}

/// Predefined prompt templates
pub fn get_prompt_templates() -> Vec<PromptTemplate> {
    vec![PromptTemplate {
        name: "build_feature".to_string(),
        description: "Walk a feature through the five-step Waymark workflow".to_string(),
        template: r#"You are building a feature with Waymark's MCP tools.

# Feature
**{title}**

{description}

# Goal
{goal}

# Workflow

Every phase is recorded on one instruction document. Work through them in order
and keep the instruction ID from step 1.

## 1. User instruction
Call `build_feature` (or `create_instruction`) with the title, description and
goal above. Note the returned `instruction_id`.

## 2. Task planning
Call `create_task_plan` with a list of subtasks. Give each a `title`,
`description`, a numeric `complexity` and, where it matters, the ids of the
subtasks it depends on (`st-1`, `st-2`, ...).

## 3. Information gathering
Call `gather_information` with typed sources:
- `{"type": "file", "path": "src/App.tsx"}` to read a file
- `{"type": "directory", "path": "src"}` to list a directory
- `{"type": "search", "query": "ThemeProvider"}` to find files containing text
- `{"type": "command", "query": "npm ls --depth 0"}` to capture command output

Use `tree_directory` and the git tools to orient yourself first if the project
is unfamiliar.

## 4. Analysis and orchestration
Call `analyze_and_orchestrate` with your `analysis` (`findings`,
`recommendations`, `decision_points`) and an `execution_plan`. Each step needs a
`title` and a `type`: `file_creation`, `file_modification`,
`command_execution` or `dependency_installation`.

## 5. Execution and result synthesis
Call `execute_step` once per step with its `execution_details`:
- file_creation: `file_path`, `content`
- file_modification: `file_path` and either `content` or `patches`
  (`replace`, `insert`, `delete`)
- command_execution: `command`
- dependency_installation: `packages`, optional `package_manager` (npm or pip)

A failed step can be executed again after fixing its details. Finish with
`generate_final_report` and summarise the artifacts it lists."#
            .to_string(),
        arguments: vec![
            PromptTemplateArg {
                name: "title".to_string(),
                description: "Brief title for the feature".to_string(),
                required: true,
            },
            PromptTemplateArg {
                name: "description".to_string(),
                description: "Detailed description of the feature requirements".to_string(),
                required: true,
            },
            PromptTemplateArg {
                name: "goal".to_string(),
                description: "The specific goal or outcome to achieve".to_string(),
                required: false,
            },
        ],
    }]
}
