use super::{Lesson, LessonGroup};

const fn lesson(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    example: &'static str,
) -> Lesson {
    Lesson {
        id,
        title,
        description,
        example,
    }
}

pub(super) static GROUPS: &[LessonGroup] = &[
    LessonGroup {
        title: "Basics",
        lessons: &[
            lesson("select", "SELECT", "Retrieve columns from a table.", "SELECT id, name FROM employees;"),
            lesson("where", "WHERE", "Filter rows based on a condition.", "SELECT name, salary FROM employees WHERE salary > 80000;"),
            lesson("order", "ORDER BY", "Sort results by one or more columns.", "SELECT name, hire_date FROM employees ORDER BY hire_date DESC;"),
            lesson("limit", "LIMIT", "Limit the number of rows returned.", "SELECT * FROM employees ORDER BY salary DESC LIMIT 3;"),
            lesson("distinct", "DISTINCT", "Return unique values only.", "SELECT DISTINCT city FROM customers ORDER BY city;"),
            lesson("alias", "AS (alias)", "Give a column or table a temporary name.", "SELECT e.name AS employee, d.name AS department FROM employees e JOIN departments d ON e.department_id = d.id;"),
        ],
    },
    LessonGroup {
        title: "Filtering",
        lessons: &[
            lesson("like", "LIKE", "Pattern matching.", "SELECT name FROM customers WHERE name LIKE 'A%';"),
            lesson("in", "IN", "Match a list of values.", "SELECT name FROM employees WHERE department_id IN (1, 3);"),
            lesson("between", "BETWEEN", "Match a range (inclusive).", "SELECT name, salary FROM employees WHERE salary BETWEEN 70000 AND 100000;"),
            lesson("isnull", "IS NULL", "Test for NULL values.", "SELECT name FROM employees WHERE manager_id IS NULL;"),
            lesson("case", "CASE", "Conditional expressions.", "SELECT name, CASE WHEN salary >= 100000 THEN 'High' WHEN salary >= 80000 THEN 'Medium' ELSE 'Low' END AS salary_band FROM employees;"),
        ],
    },
    LessonGroup {
        title: "Aggregation",
        lessons: &[
            lesson("count", "COUNT", "Count rows.", "SELECT COUNT(*) AS num_employees FROM employees;"),
            lesson("avg", "AVG", "Average of a column.", "SELECT d.name AS department, ROUND(AVG(e.salary), 2) AS avg_salary FROM employees e JOIN departments d ON e.department_id = d.id GROUP BY d.name;"),
            lesson("group", "GROUP BY", "Group rows and aggregate.", "SELECT d.name AS department, COUNT(*) AS num FROM employees e JOIN departments d ON e.department_id = d.id GROUP BY d.name HAVING COUNT(*) >= 2;"),
            lesson("having", "HAVING", "Filter aggregated groups.", "SELECT department_id, COUNT(*) AS num FROM employees GROUP BY department_id HAVING COUNT(*) > 1;"),
        ],
    },
    LessonGroup {
        title: "Joins",
        lessons: &[
            lesson("join", "INNER JOIN", "Return matching rows from both tables.", "SELECT e.name, d.name AS department FROM employees e INNER JOIN departments d ON e.department_id = d.id;"),
            lesson("left", "LEFT JOIN", "All rows from left table, matched on right.", "SELECT c.name, ROUND(IFNULL(SUM(o.amount),0),2) AS total_spent FROM customers c LEFT JOIN orders o ON o.customer_id = c.id GROUP BY c.id ORDER BY total_spent DESC;"),
            lesson("cross", "CROSS JOIN", "Cartesian product of two tables.", "SELECT d.name AS department, c.city FROM departments d CROSS JOIN (SELECT DISTINCT city FROM customers) c ORDER BY d.name, c.city;"),
            lesson("self", "SELF JOIN", "Join a table to itself.", "SELECT e1.name AS employee, e2.name AS manager FROM employees e1 LEFT JOIN employees e2 ON e1.manager_id = e2.id ORDER BY employee;"),
        ],
    },
    LessonGroup {
        title: "Set operations",
        lessons: &[
            lesson("union", "UNION", "Combine result sets, remove duplicates.", "SELECT city FROM customers WHERE city LIKE 'New%' UNION SELECT city FROM customers WHERE city LIKE 'San%';"),
            lesson("intersect", "INTERSECT", "Rows common to both result sets.", "SELECT city FROM customers WHERE city LIKE '%o%' INTERSECT SELECT city FROM customers WHERE city LIKE '%i%';"),
            lesson("except", "EXCEPT", "Rows from first not in second.", "SELECT city FROM customers EXCEPT SELECT city FROM customers WHERE city='Chicago';"),
        ],
    },
    LessonGroup {
        title: "DDL & Indexes",
        lessons: &[
            lesson("create-table", "CREATE TABLE", "Create a new table.", "CREATE TABLE projects (id INTEGER PRIMARY KEY, name TEXT, department_id INTEGER);"),
            lesson("insert", "INSERT", "Insert rows into a table.", "INSERT INTO projects (name, department_id) VALUES ('Migration', 1); SELECT * FROM projects;"),
            lesson("update", "UPDATE", "Modify existing rows.", "UPDATE employees SET salary = salary * 1.05 WHERE department_id = 2; SELECT name, salary FROM employees WHERE department_id = 2 ORDER BY salary DESC;"),
            lesson("delete", "DELETE", "Remove rows from a table.", "DELETE FROM orders WHERE amount < 100; SELECT * FROM orders ORDER BY id;"),
            lesson("alter", "ALTER TABLE", "Change table structure (limited in SQLite).", "ALTER TABLE employees ADD COLUMN email TEXT; UPDATE employees SET email = lower(name) || '@example.com'; SELECT name, email FROM employees ORDER BY id;"),
            lesson("drop-table", "DROP TABLE", "Remove a table.", "DROP TABLE projects; SELECT name FROM sqlite_master WHERE type = 'table';"),
            lesson("create-index", "CREATE INDEX", "Add an index to speed up lookups.", "CREATE INDEX idx_employees_dept ON employees(department_id); SELECT name FROM sqlite_master WHERE type='index';"),
        ],
    },
    LessonGroup {
        title: "Transactions & Subqueries",
        lessons: &[
            lesson("transaction", "BEGIN/COMMIT/ROLLBACK", "Group statements into a transaction.", "BEGIN; UPDATE employees SET salary = salary - 1000 WHERE id = 2; ROLLBACK; SELECT id, name, salary FROM employees WHERE id = 2;"),
            lesson("exists", "EXISTS", "Test for existence of related rows.", "SELECT name FROM customers c WHERE EXISTS (SELECT 1 FROM orders o WHERE o.customer_id = c.id AND o.amount > 200);"),
        ],
    },
];
