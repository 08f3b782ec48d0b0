use serde::Serialize;

use crate::irt::DifficultyLevel;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicContent {
    pub content: &'static [&'static str],
    pub weightage: u32,
    pub learning_objectives: &'static [&'static str],
}

#[derive(Debug)]
struct SubjectEntry {
    name: &'static str,
    topics: &'static [(&'static str, TopicContent)],
    /// Subjects taught as a single unit carry their content directly.
    own: Option<TopicContent>,
}

const fn topic(
    content: &'static [&'static str],
    weightage: u32,
    learning_objectives: &'static [&'static str],
) -> TopicContent {
    TopicContent { content, weightage, learning_objectives }
}

static SUBJECTS: &[SubjectEntry] = &[
    SubjectEntry {
        name: "Mathematics",
        topics: &[
            (
                "Algebra",
                topic(
                    &["Linear Equations", "Quadratic Equations", "Arithmetic Progression"],
                    35,
                    &[
                        "Solve linear equations in two variables",
                        "Understand quadratic equations and their roots",
                        "Master arithmetic and geometric progressions",
                    ],
                ),
            ),
            (
                "Geometry",
                topic(
                    &["Similarity", "Pythagoras Theorem", "Circle"],
                    30,
                    &[
                        "Apply similarity criteria to geometric problems",
                        "Solve problems using Pythagoras theorem",
                        "Understand circle theorems and applications",
                    ],
                ),
            ),
        ],
        own: None,
    },
    SubjectEntry {
        name: "Science",
        topics: &[
            (
                "Physics",
                topic(
                    &["Gravitation", "Periodic Classification", "Electromagnetism"],
                    25,
                    &[
                        "Understand universal law of gravitation",
                        "Classify elements using periodic table",
                        "Solve numericals on electromagnetic induction",
                    ],
                ),
            ),
            (
                "Chemistry",
                topic(
                    &["Acids and Bases", "Chemical Reactions", "Oxidation and Reduction"],
                    25,
                    &[
                        "Identify properties of acids and bases",
                        "Balance chemical reactions",
                        "Understand oxidation-reduction processes",
                    ],
                ),
            ),
            (
                "Biology",
                topic(
                    &["Life Processes", "Control in the Living", "Reproduction in the Living"],
                    25,
                    &[
                        "Understand human circulatory and respiratory systems",
                        "Learn about nervous and hormonal control",
                        "Study different modes of reproduction in living organisms",
                    ],
                ),
            ),
        ],
        own: None,
    },
    SubjectEntry {
        name: "Social Science",
        topics: &[
            (
                "History",
                topic(
                    &["Imperialism", "20th Century Age of Conflict", "Emancipation of Asia and Africa"],
                    25,
                    &[
                        "Analyze the impact of imperialism on global history",
                        "Understand the causes and effects of world wars",
                        "Study the movements leading to independence in Asia and Africa",
                    ],
                ),
            ),
            (
                "Geography",
                topic(
                    &["Physical Features of India", "Climate", "Natural Resources"],
                    25,
                    &[
                        "Identify major physical features of India",
                        "Understand the climate patterns and their effects",
                        "Learn about the distribution and conservation of natural resources",
                    ],
                ),
            ),
            (
                "Economics",
                topic(
                    &["Development", "Sectors of the Indian Economy", "Money and Credit"],
                    25,
                    &[
                        "Understand the concept of development and its indicators",
                        "Analyze the role of different sectors in the economy",
                        "Learn about the banking system and credit facilities",
                    ],
                ),
            ),
            (
                "Political Science",
                topic(
                    &["Democracy and Diversity", "Political Parties", "Outcomes of Democracy"],
                    25,
                    &[
                        "Understand the principles of democracy",
                        "Study the role and functions of political parties",
                        "Evaluate the outcomes and challenges of democratic governance",
                    ],
                ),
            ),
        ],
        own: None,
    },
    SubjectEntry {
        name: "Languages",
        topics: &[
            (
                "English",
                topic(
                    &["Prose", "Poetry", "Grammar"],
                    25,
                    &[
                        "Enhance reading comprehension skills",
                        "Appreciate and analyze poetic expressions",
                        "Master grammatical structures and usage",
                    ],
                ),
            ),
            (
                "Marathi",
                topic(
                    &["Prose", "Poetry", "Grammar"],
                    25,
                    &[
                        "Develop reading and writing skills in Marathi",
                        "Understand and interpret Marathi literature",
                        "Apply grammatical rules in writing",
                    ],
                ),
            ),
            (
                "Hindi",
                topic(
                    &["Prose", "Poetry", "Grammar"],
                    25,
                    &[
                        "Improve proficiency in reading and writing Hindi",
                        "Analyze Hindi literary works",
                        "Grasp and use Hindi grammar effectively",
                    ],
                ),
            ),
        ],
        own: None,
    },
    SubjectEntry {
        name: "Information Technology",
        topics: &[],
        own: Some(topic(
            &["ICT in Daily Life", "Digital Literacy", "Cyber Safety"],
            25,
            &[
                "Understand the role of ICT in modern society",
                "Develop skills in using digital tools and platforms",
                "Learn about online safety and responsible internet usage",
            ],
        )),
    },
];

const OUTPUT_SCHEMA: &str = r#"Return a single JSON object of the form:
{
  "questions": [
    {
      "text": "question text",
      "type": "MCQ | short | true_false",
      "options": ["option1", "option2", "..."],
      "answer": "correct answer, verbatim one of the options for MCQ",
      "difficulty": "basic | intermediate | advanced",
      "marks": 1,
      "solution": "step-by-step solution"
    }
  ]
}"#;

/// Fixed board syllabus that quiz prompts are grounded in.
#[derive(Debug, Clone)]
pub struct StaticSyllabus {
    board: String,
    class_name: String,
}

impl StaticSyllabus {
    pub fn new(board: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            class_name: class_name.into(),
        }
    }

    pub fn board(&self) -> &str {
        &self.board
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn subjects(&self) -> Vec<&'static str> {
        SUBJECTS.iter().map(|s| s.name).collect()
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        find_subject(subject).is_some()
    }

    pub fn topics(&self, subject: &str) -> Vec<&'static str> {
        find_subject(subject)
            .map(|s| s.topics.iter().map(|(name, _)| *name).collect())
            .unwrap_or_default()
    }

    /// Content for `(subject, topic)`; single-unit subjects answer with their own content.
    pub fn topic(&self, subject: &str, topic: Option<&str>) -> Option<&'static TopicContent> {
        let entry = find_subject(subject)?;
        topic
            .and_then(|t| {
                entry
                    .topics
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(t.trim()))
                    .map(|(_, content)| content)
            })
            .or(entry.own.as_ref())
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You write exam practice questions for {} Class {} students. Reply with JSON only.",
            self.board, self.class_name
        )
    }

    pub fn build_prompt(&self, level: DifficultyLevel, subject: &str, topic: Option<&str>) -> String {
        let mut prompt = format!(
            "Generate {} Class {} level questions for {}. Focus on tricky MCQs and true/false questions.",
            self.board, self.class_name, subject
        );
        if let Some(t) = topic {
            prompt.push_str(&format!(" Topic: {t}."));
        }
        prompt.push_str(&format!(" Student level: {level}. {}\n", level_guidance(level)));

        if let Some(content) = self.topic(subject, topic) {
            prompt.push_str(&format!(
                "\nSyllabus details:\n- Key concepts: {}\n- Learning objectives: {}\n- Weightage: {}% of total marks\n",
                content.content.join(", "),
                content.learning_objectives.join(", "),
                content.weightage
            ));
        }

        prompt.push_str(
            "\nGuidelines:\n\
             - Include multiple question types (MCQ, true_false, short)\n\
             - Give a step-by-step solution for each question\n\
             - Progress in difficulty within the quiz\n\
             - Follow the board's exam patterns and include real-world applications where sensible\n\n",
        );
        prompt.push_str(OUTPUT_SCHEMA);
        prompt
    }
}

fn find_subject(subject: &str) -> Option<&'static SubjectEntry> {
    let subject = subject.trim();
    SUBJECTS.iter().find(|s| s.name.eq_ignore_ascii_case(subject))
}

fn level_guidance(level: DifficultyLevel) -> &'static str {
    match level {
        DifficultyLevel::Basic => "Include simple recall questions and basic problem solving.",
        DifficultyLevel::Intermediate => {
            "Mix conceptual questions with problems of moderate difficulty."
        }
        DifficultyLevel::Advanced => {
            "Use challenging application-based questions that need higher order thinking."
        }
    }
}
