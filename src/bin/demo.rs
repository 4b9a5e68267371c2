use rusty_trees::data::dataset::Dataset;
use rusty_trees::data::value::Value;
use rusty_trees::metrics::confusion::ClassificationMetrics;
use rusty_trees::trees::classifier::observations;
use rusty_trees::trees::{Criterion, DecisionTreeClassifier};
use std::error::Error;

fn visitor(
    referrer: &str,
    country: &str,
    read_faq: &str,
    pages: i32,
    service: &str,
) -> (Vec<Value>, String) {
    (
        vec![
            Value::from(referrer),
            Value::from(country),
            Value::from(read_faq),
            Value::from(pages),
        ],
        service.to_string(),
    )
}

fn visitors() -> Result<Dataset<String>, Box<dyn Error>> {
    Ok(Dataset::from_rows(vec![
        visitor("slashdot", "USA", "yes", 18, "None"),
        visitor("google", "France", "yes", 23, "Premium"),
        visitor("digg", "USA", "yes", 24, "Basic"),
        visitor("kiwitobes", "France", "yes", 23, "Basic"),
        visitor("google", "UK", "no", 21, "Premium"),
        visitor("(direct)", "New Zealand", "no", 12, "None"),
        visitor("(direct)", "UK", "no", 21, "Basic"),
        visitor("google", "USA", "no", 24, "Premium"),
        visitor("slashdot", "France", "yes", 19, "None"),
        visitor("digg", "USA", "no", 18, "None"),
        visitor("google", "UK", "no", 18, "None"),
        visitor("kiwitobes", "UK", "no", 19, "None"),
        visitor("digg", "New Zealand", "yes", 12, "Basic"),
        visitor("slashdot", "UK", "no", 21, "None"),
        visitor("google", "UK", "yes", 18, "Basic"),
        visitor("kiwitobes", "France", "yes", 19, "Basic"),
    ])?)
}

fn print_distribution(
    name: &str,
    classifier: &DecisionTreeClassifier<String>,
    observation: &[Option<Value>],
) -> Result<(), Box<dyn Error>> {
    let distribution = classifier.classify(observation)?;
    let weights = distribution
        .iter()
        .map(|(label, weight)| format!("{}: {:.3}", label, weight))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} -> {{{}}}", name, weights);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let dataset = visitors()?;

    for criterion in [Criterion::Gini, Criterion::Entropy] {
        let mut classifier = DecisionTreeClassifier::with_params(Some(criterion), None, None)?;
        println!("Criterion: {}", criterion);
        println!("{}", classifier.fit(&dataset)?);

        if let Some(root) = classifier.root() {
            print!("{}", root);
        }

        let predictions = classifier.predict(&observations(dataset.x()))?;
        println!(
            "Training accuracy: {}%",
            classifier.accuracy(dataset.y(), &predictions)? * 100.0
        );

        print_distribution(
            "(direct), USA, yes, 5",
            &classifier,
            &[
                Some(Value::from("(direct)")),
                Some(Value::from("USA")),
                Some(Value::from("yes")),
                Some(Value::from(5)),
            ],
        )?;
        print_distribution(
            "google, ?, yes, ?",
            &classifier,
            &[Some(Value::from("google")), None, Some(Value::from("yes")), None],
        )?;
        print_distribution(
            "google, France, ?, ?",
            &classifier,
            &[
                Some(Value::from("google")),
                Some(Value::from("France")),
                None,
                None,
            ],
        )?;

        for min_gain in [0.1, 1.0] {
            classifier.prune(min_gain)?;
            println!("Pruned with minimum gain {}:", min_gain);
            if let Some(root) = classifier.root() {
                print!("{}", root);
            }
        }
        println!();
    }

    Ok(())
}
