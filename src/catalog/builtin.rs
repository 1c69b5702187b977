//! Built-in fallback catalog
//!
//! Served whenever the remote catalog cannot be fetched or parsed, so the
//! journey always has content.

use super::model::{Assessment, FlowKind, Lesson, Module, QuizQuestion};

fn lesson(id: &str, title: &str, focus: &str, summary: &str, scripture: &str, content: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        focus: focus.to_string(),
        summary: summary.to_string(),
        scripture: scripture.to_string(),
        content: content.to_string(),
    }
}

fn question(prompt: &str, options: &[&str], answer: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer,
    }
}

/// Foundations, Prophecy and Discernment, in unlock order
pub fn builtin_modules() -> Vec<Module> {
    vec![foundations(), prophecy(), discernment()]
}

fn foundations() -> Module {
    let lessons = vec![
        lesson(
            "foundations-1",
            "The Word as Foundation",
            "Authority of Scripture",
            "Why the study begins with the reliability of the written Word.",
            "2 Timothy 3:16-17",
            "All Scripture is given by inspiration of God. Before any doctrine is studied, \
             the learner settles where truth is measured from.",
        ),
        lesson(
            "foundations-2",
            "Creation and Purpose",
            "Origins",
            "The opening chapters of Genesis frame every later theme.",
            "Genesis 1:1, 1:27",
            "Humanity is made in the image of God. Purpose precedes function, and the \
             rest of the curriculum builds on that order.",
        ),
        lesson(
            "foundations-3",
            "Grace and Faith",
            "Salvation",
            "Salvation is received, not earned.",
            "Ephesians 2:8-9",
            "Grace is the gift and faith is the hand that receives it. Works follow as \
             fruit rather than as payment.",
        ),
    ];

    Module {
        id: "foundations".to_string(),
        title: "Foundations".to_string(),
        description: "Core truths every later module relies on.".to_string(),
        lessons_count: lessons.len() as u32,
        points_value: 500,
        lessons,
        prerequisites: vec![],
        flow: FlowKind::Quiz,
        assessment: Assessment::Quiz {
            questions: vec![
                question(
                    "According to 2 Timothy 3:16, how is Scripture given?",
                    &["By tradition", "By inspiration of God", "By councils"],
                    1,
                ),
                question(
                    "In whose image was humanity created?",
                    &["The angels'", "God's", "Adam's"],
                    1,
                ),
                question(
                    "Ephesians 2:8 says we are saved by grace through...",
                    &["works", "faith", "law"],
                    1,
                ),
                question(
                    "Which book opens with the account of creation?",
                    &["Exodus", "Genesis", "John"],
                    1,
                ),
            ],
        },
    }
}

fn prophecy() -> Module {
    let lessons = vec![
        lesson(
            "prophecy-1",
            "Reading Prophecy",
            "Method",
            "Prophecy is read in context and compared with Scripture.",
            "2 Peter 1:20-21",
            "No prophecy is of private interpretation. Symbols are explained by other \
             passages before they are applied to events.",
        ),
        lesson(
            "prophecy-2",
            "The Statue of Daniel 2",
            "Kingdoms",
            "A sequence of kingdoms ending in one that is never destroyed.",
            "Daniel 2:31-45",
            "Gold, silver, bronze, iron, then iron mixed with clay. The stone cut without \
             hands fills the whole earth.",
        ),
        lesson(
            "prophecy-3",
            "Messianic Fulfillment",
            "Christ in prophecy",
            "Prophecies fulfilled in the life of Jesus anchor confidence in the rest.",
            "Micah 5:2; Isaiah 53",
            "Birthplace, ministry and suffering were foretold centuries before they \
             happened.",
        ),
    ];

    Module {
        id: "prophecy".to_string(),
        title: "Prophecy".to_string(),
        description: "How prophecy is read and where it has been fulfilled.".to_string(),
        lessons_count: lessons.len() as u32,
        points_value: 1200,
        lessons,
        prerequisites: vec![0],
        flow: FlowKind::Quiz,
        assessment: Assessment::Quiz {
            questions: vec![
                question(
                    "What does 2 Peter 1:20 say about prophecy?",
                    &[
                        "It is of no private interpretation",
                        "It is only symbolic",
                        "It ended with the prophets",
                    ],
                    0,
                ),
                question(
                    "In Daniel 2, what destroys the statue?",
                    &["A flood", "A stone cut without hands", "A fire"],
                    1,
                ),
                question(
                    "Which prophet names Bethlehem as the Messiah's birthplace?",
                    &["Micah", "Jonah", "Amos"],
                    0,
                ),
                question(
                    "What metal forms the head of the statue?",
                    &["Silver", "Iron", "Gold"],
                    2,
                ),
                question(
                    "Which chapter of Isaiah describes the suffering servant?",
                    &["Isaiah 6", "Isaiah 40", "Isaiah 53"],
                    2,
                ),
            ],
        },
    }
}

fn discernment() -> Module {
    let lessons = vec![
        lesson(
            "discernment-1",
            "Testing the Spirits",
            "Discernment",
            "Not every message claiming authority is to be believed.",
            "1 John 4:1",
            "Test what is taught against what has already been revealed.",
        ),
        lesson(
            "discernment-2",
            "The Berean Habit",
            "Daily study",
            "The Bereans searched the Scriptures daily.",
            "Acts 17:11",
            "Receive the word readily, then verify it. Eagerness and examination belong \
             together.",
        ),
        lesson(
            "discernment-3",
            "Fruit as Evidence",
            "Character",
            "Teaching is also known by the fruit it produces.",
            "Matthew 7:15-20; Galatians 5:22-23",
            "Good trees bear good fruit. Character over time confirms or exposes a \
             message.",
        ),
    ];

    Module {
        id: "discernment".to_string(),
        title: "Discernment".to_string(),
        description: "Habits for weighing teaching against Scripture.".to_string(),
        lessons_count: lessons.len() as u32,
        points_value: 2500,
        lessons,
        prerequisites: vec![1],
        flow: FlowKind::Checklist,
        assessment: Assessment::Checklist {
            items: vec![
                "I will compare new teaching with Scripture before accepting it".to_string(),
                "I will set aside time for daily study".to_string(),
                "I will look at the fruit of a teaching, not only its claims".to_string(),
            ],
        },
    }
}
