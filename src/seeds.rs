//! Built-in demonstration record used by "Load Sample Data".

use crate::form::FormState;

/// Fixed onboarding record: a machine-learning question with four rubric points.
/// Can be replaced through the `[sample]` table of the TOML config.
pub fn sample_form() -> FormState {
  FormState {
    question: "Explain the concept of machine learning and its applications.".into(),
    rubrics: "Definition of machine learning, Types of machine learning, Real-world applications, Examples".into(),
    correct_answer: "Machine learning is a subset of artificial intelligence that enables systems to learn and improve from experience without being explicitly programmed. There are three main types: supervised learning (learning from labeled data), unsupervised learning (finding patterns in unlabeled data), and reinforcement learning (learning through trial and error). Machine learning is used in various real-world applications such as recommendation systems (Netflix, Spotify), image recognition (face detection, medical imaging), natural language processing (chatbots, translation), and autonomous vehicles.".into(),
    student_answer: "Machine learning allows computers to learn from data without being programmed. It includes supervised and unsupervised learning. Examples include Netflix recommendations and face recognition in smartphones.".into(),
    total_marks: 10.0,
  }
}
